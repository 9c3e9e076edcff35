//! The page for editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    account::get_all_accounts,
    category::get_all_categories,
    dependent::get_all_dependents,
    goal::get_all_goals,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::today,
    transaction::{
        Transaction, TransactionId,
        form::{FormValues, LinkOptions, transaction_form_fields},
        get_transaction,
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a transaction.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve transaction {transaction_id}: {error}")
    })?;

    let options = LinkOptions {
        categories: get_all_categories(&connection)?,
        accounts: get_all_accounts(&connection)?,
        goals: get_all_goals(&connection)?,
        dependents: get_all_dependents(&connection)?,
    };

    // Scheduled rows may sit in the future, so only cap the date for
    // ordinary transactions.
    let max_date = if transaction.scheduled {
        None
    } else {
        Some(today(&state.local_timezone))
    };

    Ok(edit_transaction_view(&transaction, max_date, &options).into_response())
}

fn edit_transaction_view(
    transaction: &Transaction,
    max_date: Option<Date>,
    options: &LinkOptions,
) -> Markup {
    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_TRANSACTION, transaction.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (transaction_form_fields(
                    FormValues::from_transaction(transaction),
                    max_date,
                    options,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Transaction" }
            }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}
