//! The endpoint for updating a transaction.

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
    AppState, Error, endpoints,
    transaction::{TransactionForm, TransactionId, get_transaction, update_transaction},
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a transaction. Scheduling fields the form
/// does not cover are kept unchanged. Redirects to the transactions view on
/// success.
pub async fn edit_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let existing = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not retrieve transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_transaction(
        transaction_id,
        form.into_builder_for(&existing),
        &connection,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod edit_transaction_endpoint_tests {
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
        db::initialize,
        endpoints,
        schedule::Recurrence,
        test_utils::assert_hx_redirect,
        transaction::{
            TransactionBuilder, TransactionForm, TransactionKind, TransactionStatus,
            create_transaction, get_transaction,
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn get_edit_transaction_state() -> EditTransactionState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn updates_transaction_and_redirects() {
        let state = get_edit_transaction_state();
        let transaction = create_transaction(
            TransactionBuilder {
                kind: TransactionKind::Expense,
                amount: -12.5,
                date: date!(2024 - 06 - 01),
                description: "Lunch".to_string(),
                ..TransactionBuilder::default()
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test transaction");

        let form = TransactionForm {
            kind: TransactionKind::Expense,
            amount: 20.0,
            date: date!(2024 - 06 - 02),
            description: "Dinner".to_string(),
            category_id: None,
            account_id: None,
            goal_id: None,
            dependent_id: None,
        };
        let response = edit_transaction_endpoint(Path(transaction.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let updated = get_transaction(transaction.id, &state.db_connection.lock().unwrap())
            .expect("Could not get updated transaction");
        assert_eq!(updated.amount, -20.0);
        assert_eq!(updated.description, "Dinner");
    }

    #[tokio::test]
    async fn keeps_scheduling_fields() {
        let state = get_edit_transaction_state();
        let transaction = create_transaction(
            TransactionBuilder {
                kind: TransactionKind::Expense,
                amount: -100.0,
                date: date!(2024 - 07 - 01),
                description: "Rent".to_string(),
                status: TransactionStatus::Pending,
                scheduled: true,
                recurrence: Recurrence::Monthly,
                series: Some(3),
                reference: Some("3A".to_string()),
                ..TransactionBuilder::default()
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test transaction");

        let form = TransactionForm {
            kind: TransactionKind::Expense,
            amount: 110.0,
            date: date!(2024 - 07 - 01),
            description: "Rent".to_string(),
            category_id: None,
            account_id: None,
            goal_id: None,
            dependent_id: None,
        };
        edit_transaction_endpoint(Path(transaction.id), State(state.clone()), Form(form)).await;

        let updated = get_transaction(transaction.id, &state.db_connection.lock().unwrap())
            .expect("Could not get updated transaction");
        assert_eq!(updated.amount, -110.0);
        assert_eq!(updated.status, TransactionStatus::Pending);
        assert!(updated.scheduled);
        assert_eq!(updated.recurrence, Recurrence::Monthly);
        assert_eq!(updated.series, Some(3));
        assert_eq!(updated.reference.as_deref(), Some("3A"));
    }

    #[tokio::test]
    async fn invalid_id_returns_not_found() {
        let state = get_edit_transaction_state();
        let form = TransactionForm {
            kind: TransactionKind::Expense,
            amount: 20.0,
            date: date!(2024 - 06 - 02),
            description: "Dinner".to_string(),
            category_id: None,
            account_id: None,
            goal_id: None,
            dependent_id: None,
        };

        let response = edit_transaction_endpoint(Path(999), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
