//! The endpoint for updating an account.

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
    account::{AccountForm, AccountId, core::update_account},
    endpoints,
};

/// The state needed to update an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an account. Redirects to the accounts view on
/// success.
pub async fn edit_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_account(account_id, &form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingAccount) => Error::UpdateMissingAccount.into_alert_response(),
        Err(error @ Error::DuplicateAccountName(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod edit_account_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountForm, create_account, create_account_table, get_account},
        endpoints,
        test_utils::assert_hx_redirect,
    };

    use super::{EditAccountState, edit_account_endpoint};

    fn get_edit_account_state() -> EditAccountState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_account_table(&connection).expect("Could not create account table");

        EditAccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn updates_account_and_redirects() {
        let state = get_edit_account_state();
        let account = create_account(
            &AccountForm {
                name: "Checking".to_string(),
                balance: 100.0,
                date: date!(2024 - 01 - 01),
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test account");

        let form = AccountForm {
            name: "Everyday".to_string(),
            balance: 150.0,
            date: date!(2024 - 02 - 01),
        };
        let response = edit_account_endpoint(Path(account.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ACCOUNTS_VIEW);

        let updated = get_account(account.id, &state.db_connection.lock().unwrap())
            .expect("Could not get updated account");
        assert_eq!(updated.name, "Everyday");
        assert_eq!(updated.balance, 150.0);
    }

    #[tokio::test]
    async fn invalid_id_returns_not_found() {
        let state = get_edit_account_state();
        let form = AccountForm {
            name: "Everyday".to_string(),
            balance: 150.0,
            date: date!(2024 - 02 - 01),
        };

        let response = edit_account_endpoint(Path(999), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
