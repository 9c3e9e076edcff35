//! The core transaction data model and its database operations.
//!
//! Mutations that touch a goal-linked transaction also adjust the goal's
//! current amount inside the same SQLite transaction, so the stored amount
//! always equals the sum of the paid transactions linked to the goal.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    goal::adjust_goal_amount,
    schedule::Recurrence,
};

pub type TransactionId = DatabaseId;

/// Whether money came in, went out, or the row is a zero-amount reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned. The amount must be positive.
    Income,
    /// Money spent. The amount must be negative.
    Expense,
    /// A zero-amount marker such as a bill due date or appointment.
    Reminder,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Reminder => "reminder",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "reminder" => Ok(TransactionKind::Reminder),
            _ => Err(format!("unknown transaction kind {s}")),
        }
    }
}

/// Whether a transaction has been settled.
///
/// Scheduled transactions start out pending and are marked paid by the user.
/// Ordinary transactions are recorded after the fact and are paid from the
/// start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "paid" => Ok(TransactionStatus::Paid),
            _ => Err(format!("unknown transaction status {s}")),
        }
    }
}

/// An income, expense or reminder, possibly scheduled for a future date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// The amount of money. Negative for expenses, positive for income, zero
    /// for reminders.
    pub amount: f64,
    /// When the transaction happened, or when it is due for scheduled rows.
    pub date: Date,
    pub description: String,
    pub category_id: Option<DatabaseId>,
    pub account_id: Option<DatabaseId>,
    /// The goal or spending limit the transaction counts towards.
    pub goal_id: Option<DatabaseId>,
    /// The household member who recorded the transaction.
    pub dependent_id: Option<DatabaseId>,
    pub status: TransactionStatus,
    /// Scheduled transactions appear on the schedule page and can be marked
    /// paid.
    pub scheduled: bool,
    pub recurrence: Recurrence,
    /// The series code shared by all rows spawned from one schedule.
    pub series: Option<i64>,
    /// The human-readable reference, e.g. "12A" for the first installment of
    /// series 12.
    pub reference: Option<String>,
    /// A closed schedule never spawns successors when marked paid.
    pub closed: bool,
}

/// The field values for inserting a new transaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    pub description: String,
    pub category_id: Option<DatabaseId>,
    pub account_id: Option<DatabaseId>,
    pub goal_id: Option<DatabaseId>,
    pub dependent_id: Option<DatabaseId>,
    pub status: TransactionStatus,
    pub scheduled: bool,
    pub recurrence: Recurrence,
    pub series: Option<i64>,
    pub reference: Option<String>,
    pub closed: bool,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: 0.0,
            date: Date::MIN,
            description: String::new(),
            category_id: None,
            account_id: None,
            goal_id: None,
            dependent_id: None,
            status: TransactionStatus::Paid,
            scheduled: false,
            recurrence: Recurrence::Once,
            series: None,
            reference: None,
            closed: false,
        }
    }
}

pub(crate) const TRANSACTION_COLUMNS: &str = "id, kind, amount, date, description, category_id, \
    account_id, goal_id, dependent_id, status, scheduled, recurrence, series, reference, closed";

/// Check that the amount's sign matches the transaction kind.
///
/// # Errors
///
/// Returns an [Error::AmountSignMismatch] for a non-positive income amount, a
/// non-negative expense amount, or a non-zero reminder amount.
pub fn validate_amount(kind: TransactionKind, amount: f64) -> Result<(), Error> {
    let valid = match kind {
        TransactionKind::Income => amount > 0.0,
        TransactionKind::Expense => amount < 0.0,
        TransactionKind::Reminder => amount == 0.0,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::AmountSignMismatch(kind, amount))
    }
}

/// Create a new transaction.
///
/// If the transaction is paid and linked to a goal, the goal's current amount
/// is increased by the transaction amount within the same SQLite transaction.
///
/// # Errors
///
/// This function will return a:
/// - [Error::AmountSignMismatch] if the amount's sign does not match the kind,
/// - [Error::InvalidCategory], [Error::InvalidAccount], [Error::InvalidGoal]
///   or [Error::InvalidDependent] if a referenced row does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.kind, builder.amount)?;

    let sql_transaction = connection.unchecked_transaction()?;

    validate_references(&builder, &sql_transaction)?;
    let transaction = insert_transaction_row(&builder, &sql_transaction)?;

    if let (Some(goal_id), TransactionStatus::Paid) = (transaction.goal_id, transaction.status) {
        adjust_goal_amount(goal_id, transaction.amount, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Insert a transaction row without touching any linked goal.
///
/// Callers are expected to have validated the builder and to maintain the
/// goal amount themselves, inside their own SQLite transaction.
pub(crate) fn insert_transaction_row(
    builder: &TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let query = format!(
        "INSERT INTO \"transaction\" \
        (kind, amount, date, description, category_id, account_id, goal_id, dependent_id, \
        status, scheduled, recurrence, series, reference, closed) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) \
        RETURNING {TRANSACTION_COLUMNS}"
    );

    let transaction = connection.prepare(&query)?.query_row(
        rusqlite::params![
            builder.kind.as_str(),
            builder.amount,
            builder.date,
            builder.description,
            builder.category_id,
            builder.account_id,
            builder.goal_id,
            builder.dependent_id,
            builder.status.as_str(),
            builder.scheduled,
            builder.recurrence.as_str(),
            builder.series,
            builder.reference,
            builder.closed,
        ],
        map_transaction_row,
    )?;

    Ok(transaction)
}

/// Check that every linked row the builder names exists.
pub(crate) fn validate_references(
    builder: &TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let exists = |table: &str, id: DatabaseId| -> Result<bool, Error> {
        let query = format!("SELECT EXISTS (SELECT 1 FROM \"{table}\" WHERE id = ?1)");
        connection
            .query_row(&query, [id], |row| row.get(0))
            .map_err(Error::from)
    };

    if let Some(category_id) = builder.category_id
        && !exists("category", category_id)?
    {
        return Err(Error::InvalidCategory(Some(category_id)));
    }

    if let Some(account_id) = builder.account_id
        && !exists("account", account_id)?
    {
        return Err(Error::InvalidAccount(Some(account_id)));
    }

    if let Some(goal_id) = builder.goal_id
        && !exists("goal", goal_id)?
    {
        return Err(Error::InvalidGoal(Some(goal_id)));
    }

    if let Some(dependent_id) = builder.dependent_id
        && !exists("dependent", dependent_id)?
    {
        return Err(Error::InvalidDependent(Some(dependent_id)));
    }

    Ok(())
}

/// Retrieve a transaction by its `id`.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let query = format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id");

    connection
        .prepare(&query)?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Get one page of transactions, newest first.
pub fn get_transaction_page(
    limit: u32,
    offset: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Sort by date, and then ID to keep transaction order stable after updates
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
        ORDER BY date DESC, id DESC LIMIT ?1 OFFSET ?2"
    );

    connection
        .prepare(&query)?
        .query_map([limit, offset], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a transaction's fields with the builder's values.
///
/// Goal amounts are kept consistent within the same SQLite transaction: the
/// old row's contribution is removed and the new row's contribution is added,
/// whether the goal link or the paid status changed or not.
///
/// # Errors
///
/// Returns an [Error::UpdateMissingTransaction] if `id` does not refer to an
/// existing transaction.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.kind, builder.amount)?;

    let sql_transaction = connection.unchecked_transaction()?;

    let old = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    validate_references(&builder, &sql_transaction)?;

    let query = format!(
        "UPDATE \"transaction\" SET \
        kind = ?1, amount = ?2, date = ?3, description = ?4, category_id = ?5, \
        account_id = ?6, goal_id = ?7, dependent_id = ?8, status = ?9, scheduled = ?10, \
        recurrence = ?11, series = ?12, reference = ?13, closed = ?14 \
        WHERE id = ?15 \
        RETURNING {TRANSACTION_COLUMNS}"
    );

    let updated = sql_transaction.prepare(&query)?.query_row(
        rusqlite::params![
            builder.kind.as_str(),
            builder.amount,
            builder.date,
            builder.description,
            builder.category_id,
            builder.account_id,
            builder.goal_id,
            builder.dependent_id,
            builder.status.as_str(),
            builder.scheduled,
            builder.recurrence.as_str(),
            builder.series,
            builder.reference,
            builder.closed,
            id,
        ],
        map_transaction_row,
    )?;

    if let (Some(goal_id), TransactionStatus::Paid) = (old.goal_id, old.status) {
        adjust_goal_amount(goal_id, -old.amount, &sql_transaction)?;
    }

    if let (Some(goal_id), TransactionStatus::Paid) = (updated.goal_id, updated.status) {
        adjust_goal_amount(goal_id, updated.amount, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(updated)
}

/// Delete a transaction by its `id`, removing its contribution from any
/// linked goal within the same SQLite transaction.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingTransaction] if `id` does not refer to an
/// existing transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let old = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };

    sql_transaction.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if let (Some(goal_id), TransactionStatus::Paid) = (old.goal_id, old.status) {
        adjust_goal_amount(goal_id, -old.amount, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Create the transaction table.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category_id INTEGER,
                account_id INTEGER,
                goal_id INTEGER,
                dependent_id INTEGER,
                status TEXT NOT NULL DEFAULT 'paid',
                scheduled INTEGER NOT NULL DEFAULT 0,
                recurrence TEXT NOT NULL DEFAULT 'once',
                series INTEGER,
                reference TEXT,
                closed INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite indexes used by the dashboard and schedule pages.
    connection.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category \
            ON \"transaction\"(date, category_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_schedule \
            ON \"transaction\"(scheduled, status, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_series ON \"transaction\"(series);",
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let parse_error = |index: usize, message: String| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            message.into(),
        )
    };

    let raw_kind: String = row.get(1)?;
    let kind = raw_kind
        .parse::<TransactionKind>()
        .map_err(|message| parse_error(1, message))?;

    let raw_status: String = row.get(9)?;
    let status = raw_status
        .parse::<TransactionStatus>()
        .map_err(|message| parse_error(9, message))?;

    let raw_recurrence: String = row.get(11)?;
    let recurrence = raw_recurrence
        .parse::<Recurrence>()
        .map_err(|message| parse_error(11, message))?;

    Ok(Transaction {
        id: row.get(0)?,
        kind,
        amount: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        category_id: row.get(5)?,
        account_id: row.get(6)?,
        goal_id: row.get(7)?,
        dependent_id: row.get(8)?,
        status,
        scheduled: row.get(10)?,
        recurrence,
        series: row.get(12)?,
        reference: row.get(13)?,
        closed: row.get(14)?,
    })
}

#[cfg(test)]
mod amount_validation_tests {
    use crate::Error;

    use super::{TransactionKind, validate_amount};

    #[test]
    fn income_must_be_positive() {
        assert!(validate_amount(TransactionKind::Income, 10.0).is_ok());
        assert_eq!(
            validate_amount(TransactionKind::Income, -10.0),
            Err(Error::AmountSignMismatch(TransactionKind::Income, -10.0))
        );
        assert!(validate_amount(TransactionKind::Income, 0.0).is_err());
    }

    #[test]
    fn expense_must_be_negative() {
        assert!(validate_amount(TransactionKind::Expense, -10.0).is_ok());
        assert_eq!(
            validate_amount(TransactionKind::Expense, 10.0),
            Err(Error::AmountSignMismatch(TransactionKind::Expense, 10.0))
        );
        assert!(validate_amount(TransactionKind::Expense, 0.0).is_err());
    }

    #[test]
    fn reminder_must_be_zero() {
        assert!(validate_amount(TransactionKind::Reminder, 0.0).is_ok());
        assert!(validate_amount(TransactionKind::Reminder, 1.0).is_err());
    }
}
