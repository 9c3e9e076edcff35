//! The endpoint for marking a scheduled transaction as paid.

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
    schedule::mark_transaction_paid,
    transaction::TransactionId,
};

/// The state needed to mark a scheduled transaction as paid.
#[derive(Debug, Clone)]
pub struct PayScheduleState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PayScheduleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that marks a scheduled transaction as paid, spawning the
/// next occurrence for recurring schedules. Paying an already-paid row is a
/// no-op, so a double-clicked button cannot create duplicates. Redirects to
/// the schedule view on success.
pub async fn pay_schedule_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<PayScheduleState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match mark_transaction_paid(transaction_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SCHEDULE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::NotFound | Error::NotScheduled)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not mark transaction {transaction_id} as paid: {error}");
            error.into_alert_response()
        }
    }
}
