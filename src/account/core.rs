//! The account domain type and its database operations.

use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::Error;

pub type AccountId = i64;

/// The amount of money available in a bank account or credit card.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The name of the account with which to associate the balance.
    pub name: String,
    /// The balance.
    pub balance: f64,
    /// When the balance was last updated.
    pub date: Date,
}

/// The form data for creating or editing an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    /// The account name.
    pub name: String,
    /// The balance in dollars.
    pub balance: f64,
    /// The date when the account balance was last checked/updated.
    pub date: Date,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            balance REAL NOT NULL,
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert a new account.
///
/// # Errors
///
/// Returns an [Error::DuplicateAccountName] if an account with the same name
/// already exists.
pub fn create_account(form: &AccountForm, connection: &Connection) -> Result<Account, Error> {
    connection
        .execute(
            "INSERT INTO account (name, balance, date) VALUES (?1, ?2, ?3)",
            (&form.name, form.balance, form.date),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                Error::DuplicateAccountName(form.name.clone())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Account {
        id,
        name: form.name.clone(),
        balance: form.balance,
        date: form.date,
    })
}

/// Retrieve a single account by ID.
pub fn get_account(account_id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, name, balance, date FROM account WHERE id = :id")?
        .query_row(&[(":id", &account_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all accounts ordered alphabetically by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance, date FROM account ORDER BY name ASC")?
        .query_map([], map_row)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Update an account's name, balance and date.
pub fn update_account(
    account_id: AccountId,
    form: &AccountForm,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE account SET name = ?1, balance = ?2, date = ?3 WHERE id = ?4",
            (&form.name, form.balance, form.date, account_id),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                Error::DuplicateAccountName(form.name.clone())
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete an account by ID, unlinking its transactions in the same SQLite
/// transaction.
pub fn delete_account(account_id: AccountId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    sql_transaction.execute(
        "UPDATE \"transaction\" SET account_id = NULL WHERE account_id = ?1",
        [account_id],
    )?;
    let rows_affected =
        sql_transaction.execute("DELETE FROM account WHERE id = ?1", [account_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Get the total balance across all accounts.
pub fn get_total_account_balance(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT COALESCE(SUM(balance), 0) FROM account")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}

fn map_row(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = row.get(2)?;
    let date = row.get(3)?;

    Ok(Account {
        id,
        name,
        balance,
        date,
    })
}
