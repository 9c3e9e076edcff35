//! The endpoint for creating a new account.

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
    account::{AccountForm, create_account},
    endpoints,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account. Redirects to the accounts view
/// on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_account(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::DuplicateAccountName(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not create account with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_account_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountForm, create_account_table, get_account},
        endpoints,
        test_utils::assert_hx_redirect,
    };

    use super::{CreateAccountState, create_account_endpoint};

    fn get_create_account_state() -> CreateAccountState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_account_table(&connection).expect("Could not create account table");

        CreateAccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn creates_account_and_redirects() {
        let state = get_create_account_state();
        let form = AccountForm {
            name: "Checking".to_string(),
            balance: 100.0,
            date: date!(2024 - 01 - 01),
        };

        let response = create_account_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ACCOUNTS_VIEW);

        let account = get_account(1, &state.db_connection.lock().unwrap())
            .expect("Could not get created account");
        assert_eq!(account.name, "Checking");
        assert_eq!(account.balance, 100.0);
    }

    #[tokio::test]
    async fn duplicate_name_returns_bad_request() {
        let state = get_create_account_state();
        let form = AccountForm {
            name: "Checking".to_string(),
            balance: 100.0,
            date: date!(2024 - 01 - 01),
        };
        create_account_endpoint(State(state.clone()), Form(form.clone())).await;

        let response = create_account_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
