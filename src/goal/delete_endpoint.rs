//! The endpoint for deleting a goal.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::AlertTemplate,
    goal::{GoalId, core::delete_goal},
};

/// The state needed to delete a goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a goal. Transactions linked to the goal keep
/// their rows with the link cleared.
pub async fn delete_goal_endpoint(
    Path(goal_id): Path<GoalId>,
    State(state): State<DeleteGoalState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_goal(goal_id, &connection) {
        Ok(()) => AlertTemplate::success("Goal deleted successfully", "")
            .into_markup()
            .into_response(),
        Err(Error::DeleteMissingGoal) => Error::DeleteMissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_goal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        goal::{GoalForm, GoalKind, create_goal, get_goal},
    };

    use super::{DeleteGoalState, delete_goal_endpoint};

    fn get_delete_goal_state() -> DeleteGoalState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DeleteGoalState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_goal() {
        let state = get_delete_goal_state();
        let goal = create_goal(
            &GoalForm {
                name: "Holiday fund".to_string(),
                kind: GoalKind::Saving,
                target_amount: 2_000.0,
                start_date: date!(2024 - 01 - 01),
                end_date: date!(2024 - 12 - 31),
                category_id: None,
                account_id: None,
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test goal");

        let response = delete_goal_endpoint(Path(goal.id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(matches!(
            get_goal(goal.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        ));
    }

    #[tokio::test]
    async fn invalid_id_returns_not_found() {
        let state = get_delete_goal_state();

        let response = delete_goal_endpoint(Path(999), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
