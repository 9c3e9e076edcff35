//! The endpoint for closing a schedule.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    schedule::close_schedule,
    transaction::TransactionId,
};

/// The state needed to close a schedule.
#[derive(Debug, Clone)]
pub struct CloseScheduleState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CloseScheduleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that closes a schedule. A closed row can still be marked
/// paid but never spawns a successor. Redirects to the schedule view on
/// success.
pub async fn close_schedule_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<CloseScheduleState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match close_schedule(transaction_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SCHEDULE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::NotFound | Error::NotScheduled)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not close schedule {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
