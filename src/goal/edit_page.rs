//! The page for editing a goal.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    account::{Account, get_all_accounts},
    category::{Category, get_all_categories},
    goal::{Goal, GoalId, create_page::goal_form_fields, get_goal},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
};

/// The state needed for the edit goal page.
#[derive(Debug, Clone)]
pub struct EditGoalPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a goal.
pub async fn get_edit_goal_page(
    Path(goal_id): Path<GoalId>,
    State(state): State<EditGoalPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_goal(goal_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve goal {goal_id}: {error}"))?;
    let categories = get_all_categories(&connection)?;
    let accounts = get_all_accounts(&connection)?;

    Ok(edit_goal_view(&goal, &categories, &accounts).into_response())
}

fn edit_goal_view(goal: &Goal, categories: &[Category], accounts: &[Account]) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_GOAL, goal.id);
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
                (goal_form_fields(
                    &goal.name,
                    goal.kind,
                    goal.target_amount,
                    Some(goal.start_date),
                    Some(goal.end_date),
                    goal.category_id,
                    goal.account_id,
                    categories,
                    accounts,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Goal" }
            }
        }
    };

    base("Edit Goal", &[dollar_input_styles()], &content)
}
