//! The goals listing page with progress towards each target.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    goal::{Goal, GoalKind, get_all_goals},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links, format_currency},
    navigation::NavBar,
};

/// The state needed for the goals page.
#[derive(Debug, Clone)]
pub struct GoalsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the goals page with a progress bar for each goal.
pub async fn get_goals_page(State(state): State<GoalsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goals = get_all_goals(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve goals: {error}"))?;

    Ok(goals_view(&goals).into_response())
}

/// How far along a goal is, normalised to a dollar amount counted towards the
/// target.
///
/// Savings goals count linked income, so the signed sum is used directly.
/// Spending limits count linked expenses, which are stored as negative
/// amounts, so the sign is flipped.
fn amount_towards_target(goal: &Goal) -> f64 {
    match goal.kind {
        GoalKind::Saving => goal.current_amount,
        GoalKind::SpendingLimit => -goal.current_amount,
    }
}

fn goal_card(goal: &Goal) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_GOAL, goal.id);
    let confirm_message = format!("Are you sure you want to delete '{}'?", goal.name);

    let progress = amount_towards_target(goal);
    let percent = if goal.target_amount > 0.0 {
        (progress / goal.target_amount * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let limit_exceeded = goal.kind == GoalKind::SpendingLimit && progress > goal.target_amount;
    let bar_color = match goal.kind {
        _ if limit_exceeded => "bg-red-600",
        GoalKind::Saving => "bg-blue-600",
        GoalKind::SpendingLimit => "bg-amber-500",
    };
    let kind_label = match goal.kind {
        GoalKind::Saving => "Savings goal",
        GoalKind::SpendingLimit => "Spending limit",
    };

    html!(
        article class="p-4 rounded-lg border border-gray-200 bg-white
            dark:bg-gray-800 dark:border-gray-700 space-y-2"
        {
            header class="flex justify-between items-start"
            {
                div
                {
                    h2 class="font-semibold text-gray-900 dark:text-white" { (goal.name) }

                    p class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (kind_label) " · " (goal.start_date) " to " (goal.end_date)
                    }
                }

                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest article",
                        "delete",
                    ))
                }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700"
            {
                div
                    class=(format!("h-2.5 rounded-full {bar_color}"))
                    style=(format!("width: {percent:.0}%")) {}
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                (format_currency(progress)) " of " (format_currency(goal.target_amount))

                @if limit_exceeded {
                    span class="ml-2 font-semibold text-red-600 dark:text-red-500"
                    {
                        "Limit exceeded"
                    }
                }
            }
        }
    )
}

fn goals_view(goals: &[Goal]) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();
    let new_goal_route = endpoints::NEW_GOAL_VIEW;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Goals" }

                    a href=(new_goal_route) class=(LINK_STYLE)
                    {
                        "Create Goal"
                    }
                }

                @for goal in goals {
                    (goal_card(goal))
                }

                @if goals.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "No goals created yet. "
                        a href=(new_goal_route) class=(LINK_STYLE)
                        {
                            "Create your first goal"
                        }
                    }
                }
            }
        }
    );

    base("Goals", &[], &content)
}

#[cfg(test)]
mod goals_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        goal::{GoalForm, GoalKind, adjust_goal_amount, create_goal},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{GoalsPageState, get_goals_page};

    fn get_goals_page_state() -> GoalsPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        GoalsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn goal_form(name: &str, kind: GoalKind, target_amount: f64) -> GoalForm {
        GoalForm {
            name: name.to_string(),
            kind,
            target_amount,
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 12 - 31),
            category_id: None,
            account_id: None,
        }
    }

    #[tokio::test]
    async fn renders_goal_progress() {
        let state = get_goals_page_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let goal = create_goal(&goal_form("Holiday fund", GoalKind::Saving, 2_000.0), &connection)
                .expect("Could not create test goal");
            adjust_goal_amount(goal.id, 500.0, &connection)
                .expect("Could not adjust goal amount");
        }

        let response = get_goals_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Holiday fund"));
        assert!(text.contains("$500.00"), "want progress $500.00 in {text}");
        assert!(text.contains("$2,000.00"), "want target $2,000.00 in {text}");
        assert!(text.contains("width: 25%"), "want 25% bar width in {text}");
    }

    #[tokio::test]
    async fn flags_exceeded_spending_limit() {
        let state = get_goals_page_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let goal = create_goal(
                &goal_form("Groceries cap", GoalKind::SpendingLimit, 600.0),
                &connection,
            )
            .expect("Could not create test goal");
            // Linked expenses are negative, so overspending drives the sum down.
            adjust_goal_amount(goal.id, -700.0, &connection)
                .expect("Could not adjust goal amount");
        }

        let response = get_goals_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Limit exceeded"), "want warning in {text}");
        assert!(text.contains("width: 100%"), "want capped bar in {text}");
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = get_goals_page_state();

        let response = get_goals_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("No goals created yet"));
    }
}
