//! The endpoint for creating a new goal.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints,
    goal::{GoalForm, create_goal},
};

/// The state needed to create a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new goal. Redirects to the goals view on
/// success.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    Form(form): Form<GoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_goal(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create goal with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_goal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        goal::{GoalForm, GoalKind, get_goal},
        test_utils::assert_hx_redirect,
    };

    use super::{CreateGoalState, create_goal_endpoint};

    fn get_create_goal_state() -> CreateGoalState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CreateGoalState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn creates_goal_and_redirects() {
        let state = get_create_goal_state();
        let form = GoalForm {
            name: "Holiday fund".to_string(),
            kind: GoalKind::Saving,
            target_amount: 2_000.0,
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 12 - 31),
            category_id: None,
            account_id: None,
        };

        let response = create_goal_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::GOALS_VIEW);

        let goal =
            get_goal(1, &state.db_connection.lock().unwrap()).expect("Could not get created goal");
        assert_eq!(goal.name, "Holiday fund");
        assert_eq!(goal.target_amount, 2_000.0);
        assert_eq!(goal.current_amount, 0.0);
    }
}
