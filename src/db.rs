//! Database initialization for the application.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, account::create_account_table, category::create_category_table,
    dependent::create_dependent_table, goal::create_goal_table, note::create_note_table,
    transaction::create_transaction_table, user::create_user_table,
};

/// Create the tables for the application's domain models.
///
/// The tables are created within a single exclusive transaction so that the
/// database is either fully initialized or left untouched.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_account_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_dependent_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_note_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
