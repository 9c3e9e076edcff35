//! The page for editing an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    account::{Account, AccountId, get_account},
    account::create_page::account_form_fields,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::today,
};

/// The state needed for the edit account page.
#[derive(Debug, Clone)]
pub struct EditAccountPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing an account.
pub async fn get_edit_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve account {account_id}: {error}"))?;

    Ok(edit_account_view(&account, today(&state.local_timezone)).into_response())
}

fn edit_account_view(account: &Account, max_date: time::Date) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account.id);
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
                (account_form_fields(&account.name, account.balance, account.date, max_date))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Account" }
            }
        }
    };

    base("Edit Account", &[dollar_input_styles()], &content)
}
