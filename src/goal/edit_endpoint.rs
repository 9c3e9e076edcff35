//! The endpoint for updating a goal.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints,
    goal::{GoalForm, GoalId, core::update_goal},
};

/// The state needed to update a goal.
#[derive(Debug, Clone)]
pub struct EditGoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a goal. Redirects to the goals view on
/// success.
pub async fn edit_goal_endpoint(
    Path(goal_id): Path<GoalId>,
    State(state): State<EditGoalState>,
    Form(form): Form<GoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_goal(goal_id, &form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingGoal) => Error::UpdateMissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update goal {goal_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}
