//! The page for scheduling a transaction, either recurring or split into
//! monthly installments.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    timezone::today,
    transaction::{FormValues, LinkOptions, transaction_form_fields},
};

/// The state needed for the create schedule page.
#[derive(Debug, Clone)]
pub struct CreateSchedulePageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSchedulePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for scheduling a transaction.
pub async fn get_create_schedule_page(
    State(state): State<CreateSchedulePageState>,
) -> Result<Response, Error> {
    let options = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        LinkOptions {
            categories: get_all_categories(&connection)?,
            accounts: get_all_accounts(&connection)?,
            goals: get_all_goals(&connection)?,
            dependents: get_all_dependents(&connection)?,
        }
    };

    Ok(create_schedule_view(today(&state.local_timezone), &options).into_response())
}

fn create_schedule_view(first_due: Date, options: &LinkOptions) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_SCHEDULE_VIEW).into_html();

    let values = FormValues {
        date: Some(first_due),
        ..FormValues::default()
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_SCHEDULE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Schedule Transaction" }

                // No max date: scheduled rows are usually due in the future.
                (transaction_form_fields(values, None, options))

                div
                {
                    label for="recurrence" class=(FORM_LABEL_STYLE) { "Repeats" }

                    select id="recurrence" name="recurrence" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="once" { "Never" }
                        option value="daily" { "Daily" }
                        option value="weekly" { "Weekly" }
                        option value="monthly" { "Monthly" }
                        option value="yearly" { "Yearly" }
                    }
                }

                div
                {
                    label for="installments" class=(FORM_LABEL_STYLE)
                    {
                        "Installments (optional)"
                    }

                    input
                        id="installments"
                        type="number"
                        name="installments"
                        min="2"
                        step="1"
                        placeholder="e.g. 12 monthly payments"
                        class=(FORM_TEXT_INPUT_STYLE);

                    p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                    {
                        "Splits the schedule into monthly payments, ignoring the repeat setting."
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Schedule Transaction" }
            }
        }
    };

    base("Schedule Transaction", &[dollar_input_styles()], &content)
}
