//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/goals/{goal_id}', use
//! [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page listing scheduled and recurring transactions.
pub const SCHEDULE_VIEW: &str = "/schedule";
/// The page for creating a new scheduled transaction.
pub const NEW_SCHEDULE_VIEW: &str = "/schedule/new";
/// The page listing goals and spending limits.
pub const GOALS_VIEW: &str = "/goals";
/// The page for creating a new goal.
pub const NEW_GOAL_VIEW: &str = "/goals/new";
/// The page for editing an existing goal.
pub const EDIT_GOAL_VIEW: &str = "/goals/{goal_id}/edit";
/// The page listing all categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page to display accounts and their balances.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page for editing an existing account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The page listing household dependents.
pub const DEPENDENTS_VIEW: &str = "/dependents";
/// The page for editing an existing dependent.
pub const EDIT_DEPENDENT_VIEW: &str = "/dependents/{dependent_id}/edit";
/// The page listing notes.
pub const NOTES_VIEW: &str = "/notes";
/// The page for creating a new note.
pub const NEW_NOTE_VIEW: &str = "/notes/new";
/// The page for editing an existing note.
pub const EDIT_NOTE_VIEW: &str = "/notes/{note_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a scheduled transaction (optionally in installments).
pub const POST_SCHEDULE: &str = "/api/schedule";
/// The route to mark a scheduled transaction as paid.
pub const PAY_SCHEDULE: &str = "/api/schedule/{transaction_id}/pay";
/// The route to close a recurring series so no more successors are created.
pub const CLOSE_SCHEDULE: &str = "/api/schedule/{transaction_id}/close";
/// The route to create a goal.
pub const POST_GOAL: &str = "/api/goals";
/// The route to update a goal.
pub const PUT_GOAL: &str = "/api/goals/{goal_id}";
/// The route to delete a goal.
pub const DELETE_GOAL: &str = "/api/goals/{goal_id}";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create an account.
pub const POST_ACCOUNT: &str = "/api/accounts";
/// The route to update an account.
pub const PUT_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to delete an account.
pub const DELETE_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to create a dependent.
pub const POST_DEPENDENT: &str = "/api/dependents";
/// The route to update a dependent.
pub const PUT_DEPENDENT: &str = "/api/dependents/{dependent_id}";
/// The route to delete a dependent.
pub const DELETE_DEPENDENT: &str = "/api/dependents/{dependent_id}";
/// The route to create a note.
pub const POST_NOTE: &str = "/api/notes";
/// The route to update a note.
pub const PUT_NOTE: &str = "/api/notes/{note_id}";
/// The route to delete a note.
pub const DELETE_NOTE: &str = "/api/notes/{note_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/goals/{goal_id}', '{goal_id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
