//! The page for creating a goal or spending limit.

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
    account::{Account, get_all_accounts},
    category::{Category, get_all_categories},
    database_id::DatabaseId,
    goal::GoalKind,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
};

/// The state needed for the create goal page.
#[derive(Debug, Clone)]
pub struct CreateGoalPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for creating a goal.
pub async fn get_create_goal_page(
    State(state): State<CreateGoalPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)?;
    let accounts = get_all_accounts(&connection)?;

    Ok(create_goal_view(&categories, &accounts).into_response())
}

fn create_goal_view(categories: &[Category], accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_GOAL_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_GOAL)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (goal_form_fields(
                    "",
                    GoalKind::Saving,
                    0.0,
                    None,
                    None,
                    None,
                    None,
                    categories,
                    accounts,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Goal" }
            }
        }
    };

    base("Create Goal", &[dollar_input_styles()], &content)
}

/// The inputs shared by the create and edit goal forms.
#[allow(clippy::too_many_arguments)]
pub(super) fn goal_form_fields(
    name: &str,
    kind: GoalKind,
    target_amount: f64,
    start_date: Option<Date>,
    end_date: Option<Date>,
    category_id: Option<DatabaseId>,
    account_id: Option<DatabaseId>,
    categories: &[Category],
    accounts: &[Account],
) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Goal Name"
                value=(name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        fieldset class=(FORM_RADIO_GROUP_STYLE)
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class="flex items-center gap-2"
            {
                input
                    id="kind-saving"
                    type="radio"
                    name="kind"
                    value="saving"
                    checked[kind == GoalKind::Saving]
                    class=(FORM_RADIO_INPUT_STYLE);

                label for="kind-saving" class=(FORM_RADIO_LABEL_STYLE) { "Savings goal" }
            }

            div class="flex items-center gap-2"
            {
                input
                    id="kind-spending-limit"
                    type="radio"
                    name="kind"
                    value="spending_limit"
                    checked[kind == GoalKind::SpendingLimit]
                    class=(FORM_RADIO_INPUT_STYLE);

                label for="kind-spending-limit" class=(FORM_RADIO_LABEL_STYLE) { "Spending limit" }
            }
        }

        div
        {
            label for="target_amount" class=(FORM_LABEL_STYLE) { "Target Amount" }

            div class="input-wrapper w-full"
            {
                input
                    id="target_amount"
                    type="number"
                    name="target_amount"
                    step="0.01"
                    min="0.01"
                    value=(target_amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="start_date" class=(FORM_LABEL_STYLE) { "Start Date" }

            input
                id="start_date"
                type="date"
                name="start_date"
                value=[start_date]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="end_date" class=(FORM_LABEL_STYLE) { "End Date" }

            input
                id="end_date"
                type="date"
                name="end_date"
                value=[end_date]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category (optional)" }

            select id="category_id" name="category_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Any category" }

                @for category in categories {
                    option
                        value=(category.id)
                        selected[category_id == Some(category.id)]
                    {
                        (category.name)
                    }
                }
            }
        }

        div
        {
            label for="account_id" class=(FORM_LABEL_STYLE) { "Account (optional)" }

            select id="account_id" name="account_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Any account" }

                @for account in accounts {
                    option
                        value=(account.id)
                        selected[account_id == Some(account.id)]
                    {
                        (account.name)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod create_goal_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{CreateGoalPageState, get_create_goal_page};

    #[tokio::test]
    async fn render_page() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = CreateGoalPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_create_goal_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_GOAL, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "target_amount", "number");
        assert_form_input(&form, "start_date", "date");
        assert_form_input(&form, "end_date", "date");
    }
}
