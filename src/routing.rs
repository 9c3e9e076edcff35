//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_accounts_page, get_create_account_page, get_edit_account_page,
    },
    auth::{auth_guard, auth_guard_hx},
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    dependent::{
        create_dependent_endpoint, delete_dependent_endpoint, edit_dependent_endpoint,
        get_dependents_page, get_edit_dependent_page,
    },
    endpoints,
    goal::{
        create_goal_endpoint, delete_goal_endpoint, edit_goal_endpoint, get_create_goal_page,
        get_edit_goal_page, get_goals_page,
    },
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    note::{
        create_note_endpoint, delete_note_endpoint, edit_note_endpoint, get_create_note_page,
        get_edit_note_page, get_notes_page,
    },
    register::{get_register_page, register_user},
    schedule::{
        close_schedule_endpoint, create_schedule_endpoint, get_create_schedule_page,
        get_schedule_page, pay_schedule_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::SCHEDULE_VIEW, get(get_schedule_page))
        .route(endpoints::NEW_SCHEDULE_VIEW, get(get_create_schedule_page))
        .route(endpoints::GOALS_VIEW, get(get_goals_page))
        .route(endpoints::NEW_GOAL_VIEW, get(get_create_goal_page))
        .route(endpoints::EDIT_GOAL_VIEW, get(get_edit_goal_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_create_account_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .route(endpoints::DEPENDENTS_VIEW, get(get_dependents_page))
        .route(endpoints::EDIT_DEPENDENT_VIEW, get(get_edit_dependent_page))
        .route(endpoints::NOTES_VIEW, get(get_notes_page))
        .route(endpoints::NEW_NOTE_VIEW, get(get_create_note_page))
        .route(endpoints::EDIT_NOTE_VIEW, get(get_edit_note_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth
    // redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::POST_TRANSACTION,
                post(create_transaction_endpoint),
            )
            .route(endpoints::PUT_TRANSACTION, put(edit_transaction_endpoint))
            .route(
                endpoints::DELETE_TRANSACTION,
                delete(delete_transaction_endpoint),
            )
            .route(endpoints::POST_SCHEDULE, post(create_schedule_endpoint))
            .route(endpoints::PAY_SCHEDULE, post(pay_schedule_endpoint))
            .route(endpoints::CLOSE_SCHEDULE, post(close_schedule_endpoint))
            .route(endpoints::POST_GOAL, post(create_goal_endpoint))
            .route(endpoints::PUT_GOAL, put(edit_goal_endpoint))
            .route(endpoints::DELETE_GOAL, delete(delete_goal_endpoint))
            .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
            .route(endpoints::PUT_CATEGORY, put(update_category_endpoint))
            .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
            .route(endpoints::POST_ACCOUNT, post(create_account_endpoint))
            .route(endpoints::PUT_ACCOUNT, put(edit_account_endpoint))
            .route(endpoints::DELETE_ACCOUNT, delete(delete_account_endpoint))
            .route(endpoints::POST_DEPENDENT, post(create_dependent_endpoint))
            .route(endpoints::PUT_DEPENDENT, put(edit_dependent_endpoint))
            .route(
                endpoints::DELETE_DEPENDENT,
                delete(delete_dependent_endpoint),
            )
            .route(endpoints::POST_NOTE, post(create_note_endpoint))
            .route(endpoints::PUT_NOTE, put(edit_note_endpoint))
            .route(endpoints::DELETE_NOTE, delete(delete_note_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
