//! Centavo is a self-hosted web app for tracking personal finances: day-to-day
//! transactions, scheduled and recurring obligations, savings goals and
//! spending limits, account balances, and household dependents.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod database_id;
mod db;
mod dependent;
mod endpoints;
mod goal;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod note;
mod not_found;
mod pagination;
mod password;
mod register;
mod routing;
mod schedule;
mod transaction;

#[cfg(test)]
mod test_utils;
mod timezone;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{
    User, UserId, count_users, create_user, get_sole_user, get_user_by_id, set_user_password,
};

use crate::{
    alert::AlertTemplate, database_id::DatabaseId,
    internal_server_error::InternalServerError, not_found::get_404_not_found_response,
    transaction::TransactionKind,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an incorrect password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth or expiry cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// The category ID used to create a transaction did not match a real
    /// category.
    #[error("the category ID {0:?} does not refer to a valid category")]
    InvalidCategory(Option<DatabaseId>),

    /// The account ID used to create a transaction did not match a real
    /// account.
    #[error("the account ID {0:?} does not refer to a valid account")]
    InvalidAccount(Option<DatabaseId>),

    /// The goal ID used to create a transaction did not match a real goal.
    #[error("the goal ID {0:?} does not refer to a valid goal")]
    InvalidGoal(Option<DatabaseId>),

    /// The dependent ID used to create a transaction did not match a real
    /// dependent.
    #[error("the dependent ID {0:?} does not refer to a valid dependent")]
    InvalidDependent(Option<DatabaseId>),

    /// The amount's sign does not match the transaction kind, e.g. a positive
    /// amount for an expense.
    #[error("{1} is not a valid amount for {0} transactions")]
    AmountSignMismatch(TransactionKind, f64),

    /// Installment schedules must split the amount over at least two rows.
    #[error("installment count must be at least 2, got {0}")]
    InvalidInstallmentCount(u32),

    /// A reminder was submitted as a scheduled transaction. Scheduled
    /// transactions must carry a non-zero amount.
    #[error("reminders cannot be scheduled")]
    ScheduledReminder,

    /// A schedule operation was attempted on a transaction that is not a
    /// scheduled transaction.
    #[error("the transaction is not a scheduled transaction")]
    NotScheduled,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update a dependent that does not exist
    #[error("tried to update a dependent that is not in the database")]
    UpdateMissingDependent,

    /// Tried to delete a dependent that does not exist
    #[error("tried to delete a dependent that is not in the database")]
    DeleteMissingDependent,

    /// Tried to update a note that does not exist
    #[error("tried to update a note that is not in the database")]
    UpdateMissingNote,

    /// Tried to delete a note that does not exist
    #[error("tried to delete a note that is not in the database")]
    DeleteMissingNote,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match &self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                ),
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid category",
                    &format!("Could not find a category with the ID {category_id:?}"),
                ),
            ),
            Error::InvalidAccount(account_id) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid account",
                    &format!("Could not find an account with the ID {account_id:?}"),
                ),
            ),
            Error::InvalidGoal(goal_id) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid goal",
                    &format!("Could not find a goal with the ID {goal_id:?}"),
                ),
            ),
            Error::InvalidDependent(dependent_id) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid dependent",
                    &format!("Could not find a dependent with the ID {dependent_id:?}"),
                ),
            ),
            Error::AmountSignMismatch(kind, amount) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount for {kind} transactions."),
                ),
            ),
            Error::InvalidInstallmentCount(count) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid installment count",
                    &format!("Installments must be split over at least 2 months, got {count}."),
                ),
            ),
            Error::ScheduledReminder => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Could not create schedule",
                    "Reminders cannot be scheduled. \
                    Choose income or expense and enter a non-zero amount.",
                ),
            ),
            Error::NotScheduled => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Not a scheduled transaction",
                    "Only scheduled transactions can be marked as paid or closed.",
                ),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update category",
                    "The category could not be found.",
                ),
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete category",
                    "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted.",
                ),
            ),
            Error::UpdateMissingAccount => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update account",
                    "The account could not be found.",
                ),
            ),
            Error::DeleteMissingAccount => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete account",
                    "The account could not be found. \
                    Try refreshing the page to see if the account has already been deleted.",
                ),
            ),
            Error::UpdateMissingGoal => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error("Could not update goal", "The goal could not be found."),
            ),
            Error::DeleteMissingGoal => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete goal",
                    "The goal could not be found. \
                    Try refreshing the page to see if the goal has already been deleted.",
                ),
            ),
            Error::UpdateMissingDependent => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update dependent",
                    "The dependent could not be found.",
                ),
            ),
            Error::DeleteMissingDependent => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete dependent",
                    "The dependent could not be found. \
                    Try refreshing the page to see if the dependent has already been deleted.",
                ),
            ),
            Error::UpdateMissingNote => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error("Could not update note", "The note could not be found."),
            ),
            Error::DeleteMissingNote => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete note",
                    "The note could not be found. \
                    Try refreshing the page to see if the note has already been deleted.",
                ),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Not found",
                    "The requested item could not be found. \
                    Try refreshing the page to see if it has been removed.",
                ),
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Duplicate Category Name",
                    &format!(
                        "The category {name} already exists in the database. \
                        Choose a different name, or edit or delete the existing category.",
                    ),
                ),
            ),
            Error::DuplicateAccountName(name) => (
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Duplicate Account Name",
                    &format!(
                        "The account {name} already exists in the database. \
                        Choose a different account name, or edit or delete the existing account.",
                    ),
                ),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        };

        (status_code, alert.into_markup()).into_response()
    }
}
