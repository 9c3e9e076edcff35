//! The goal domain type and its database operations.
//!
//! A goal's `current_amount` column always equals the sum of the amounts of
//! the paid transactions linked to it. The transaction module adjusts the
//! column inside the same SQLite transaction as every linked-row mutation;
//! [recompute_goal_amount] re-derives it from scratch.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, deserialize_optional_id},
};

pub type GoalId = DatabaseId;

/// Whether the goal counts money saved up or money spent against a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// An income goal: linked income counts up towards the target.
    Saving,
    /// An expense ceiling: linked expenses count towards the limit.
    SpendingLimit,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Saving => "saving",
            GoalKind::SpendingLimit => "spending_limit",
        }
    }
}

impl Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saving" => Ok(GoalKind::Saving),
            "spending_limit" => Ok(GoalKind::SpendingLimit),
            _ => Err(format!("unknown goal kind {s}")),
        }
    }
}

/// A savings goal or spending limit over a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub kind: GoalKind,
    pub target_amount: f64,
    /// The sum of the amounts of the paid transactions linked to this goal.
    pub current_amount: f64,
    pub start_date: Date,
    pub end_date: Date,
    /// Restrict the goal to transactions in one category.
    pub category_id: Option<DatabaseId>,
    /// Restrict the goal to transactions in one account.
    pub account_id: Option<DatabaseId>,
}

/// The form data for creating or editing a goal.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalForm {
    pub name: String,
    pub kind: GoalKind,
    pub target_amount: f64,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<DatabaseId>,
}

pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            target_amount REAL NOT NULL,
            current_amount REAL NOT NULL DEFAULT 0,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            category_id INTEGER,
            account_id INTEGER
        )",
        (),
    )?;

    Ok(())
}

/// Insert a new goal with a zero current amount.
pub fn create_goal(form: &GoalForm, connection: &Connection) -> Result<Goal, Error> {
    connection.execute(
        "INSERT INTO goal \
        (name, kind, target_amount, current_amount, start_date, end_date, category_id, account_id) \
        VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            form.name,
            form.kind.as_str(),
            form.target_amount,
            form.start_date,
            form.end_date,
            form.category_id,
            form.account_id,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Goal {
        id,
        name: form.name.clone(),
        kind: form.kind,
        target_amount: form.target_amount,
        current_amount: 0.0,
        start_date: form.start_date,
        end_date: form.end_date,
        category_id: form.category_id,
        account_id: form.account_id,
    })
}

/// Retrieve a single goal by ID.
pub fn get_goal(goal_id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, target_amount, current_amount, start_date, end_date, \
            category_id, account_id FROM goal WHERE id = :id",
        )?
        .query_row(&[(":id", &goal_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all goals ordered by end date, soonest first.
pub fn get_all_goals(connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, target_amount, current_amount, start_date, end_date, \
            category_id, account_id FROM goal ORDER BY end_date ASC, id ASC",
        )?
        .query_map([], map_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Update a goal's fields, leaving its current amount untouched.
pub fn update_goal(goal_id: GoalId, form: &GoalForm, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET name = ?1, kind = ?2, target_amount = ?3, start_date = ?4, \
        end_date = ?5, category_id = ?6, account_id = ?7 WHERE id = ?8",
        rusqlite::params![
            form.name,
            form.kind.as_str(),
            form.target_amount,
            form.start_date,
            form.end_date,
            form.category_id,
            form.account_id,
            goal_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Delete a goal, unlinking its transactions in the same SQLite transaction.
pub fn delete_goal(goal_id: GoalId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    sql_transaction.execute(
        "UPDATE \"transaction\" SET goal_id = NULL WHERE goal_id = ?1",
        [goal_id],
    )?;
    let rows_affected = sql_transaction.execute("DELETE FROM goal WHERE id = ?1", [goal_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Add `delta` to the goal's current amount.
///
/// Callers must run this inside the same SQLite transaction as the linked-row
/// mutation it accounts for.
///
/// # Errors
///
/// Returns an [Error::InvalidGoal] if `goal_id` does not refer to an existing
/// goal.
pub fn adjust_goal_amount(
    goal_id: GoalId,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = current_amount + ?1 WHERE id = ?2",
        rusqlite::params![delta, goal_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidGoal(Some(goal_id)));
    }

    Ok(())
}

/// Re-derive the goal's current amount from its linked paid transactions.
pub fn recompute_goal_amount(goal_id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = (\
            SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" \
            WHERE goal_id = ?1 AND status = 'paid'\
        ) WHERE id = ?1",
        [goal_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidGoal(Some(goal_id)));
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let raw_kind: String = row.get(2)?;
    let kind = raw_kind.parse::<GoalKind>().map_err(|message| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, message.into())
    })?;

    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        kind,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        category_id: row.get(7)?,
        account_id: row.get(8)?,
    })
}

#[cfg(test)]
mod goal_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{TransactionBuilder, TransactionKind, create_transaction},
    };

    use super::{
        GoalForm, GoalKind, adjust_goal_amount, create_goal, delete_goal, get_all_goals, get_goal,
        recompute_goal_amount, update_goal,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn vacation_form() -> GoalForm {
        GoalForm {
            name: "Vacation".to_string(),
            kind: GoalKind::Saving,
            target_amount: 1000.0,
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 12 - 31),
            category_id: None,
            account_id: None,
        }
    }

    #[test]
    fn create_starts_at_zero() {
        let connection = get_test_connection();

        let goal = create_goal(&vacation_form(), &connection).expect("Could not create goal");

        assert!(goal.id > 0);
        assert_eq!(goal.current_amount, 0.0);
        assert_eq!(Ok(goal.clone()), get_goal(goal.id, &connection));
    }

    #[test]
    fn get_goal_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_goal(999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_goals_sorts_by_end_date() {
        let connection = get_test_connection();
        let mut late = vacation_form();
        late.name = "Late".to_string();
        late.end_date = date!(2025 - 12 - 31);
        create_goal(&late, &connection).expect("Could not create goal");
        let mut soon = vacation_form();
        soon.name = "Soon".to_string();
        soon.end_date = date!(2024 - 06 - 30);
        create_goal(&soon, &connection).expect("Could not create goal");

        let goals = get_all_goals(&connection).expect("Could not get goals");

        let names: Vec<&str> = goals.iter().map(|goal| goal.name.as_str()).collect();
        assert_eq!(names, vec!["Soon", "Late"]);
    }

    #[test]
    fn update_preserves_current_amount() {
        let connection = get_test_connection();
        let goal = create_goal(&vacation_form(), &connection).expect("Could not create goal");
        adjust_goal_amount(goal.id, 150.0, &connection).expect("Could not adjust goal");

        let mut form = vacation_form();
        form.name = "Holiday".to_string();
        form.target_amount = 2000.0;
        update_goal(goal.id, &form, &connection).expect("Could not update goal");

        let updated = get_goal(goal.id, &connection).expect("Could not get goal");
        assert_eq!(updated.name, "Holiday");
        assert_eq!(updated.target_amount, 2000.0);
        assert_eq!(updated.current_amount, 150.0);
    }

    #[test]
    fn update_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        let result = update_goal(999, &vacation_form(), &connection);

        assert_eq!(result, Err(Error::UpdateMissingGoal));
    }

    #[test]
    fn delete_unlinks_transactions() {
        let connection = get_test_connection();
        let goal = create_goal(&vacation_form(), &connection).expect("Could not create goal");
        let transaction = create_transaction(
            TransactionBuilder {
                kind: TransactionKind::Income,
                amount: 100.0,
                date: date!(2024 - 06 - 01),
                description: "Salary".to_string(),
                goal_id: Some(goal.id),
                ..TransactionBuilder::default()
            },
            &connection,
        )
        .expect("Could not create transaction");

        delete_goal(goal.id, &connection).expect("Could not delete goal");

        assert_eq!(get_goal(goal.id, &connection), Err(Error::NotFound));
        let unlinked =
            crate::transaction::get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(unlinked.goal_id, None);
    }

    #[test]
    fn delete_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        assert_eq!(delete_goal(999, &connection), Err(Error::DeleteMissingGoal));
    }

    #[test]
    fn adjust_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        assert_eq!(
            adjust_goal_amount(999, 1.0, &connection),
            Err(Error::InvalidGoal(Some(999)))
        );
    }

    #[test]
    fn recompute_matches_sum_of_paid_linked_transactions() {
        let connection = get_test_connection();
        let goal = create_goal(&vacation_form(), &connection).expect("Could not create goal");
        for amount in [100.0, 250.0] {
            create_transaction(
                TransactionBuilder {
                    kind: TransactionKind::Income,
                    amount,
                    date: date!(2024 - 06 - 01),
                    description: "Deposit".to_string(),
                    goal_id: Some(goal.id),
                    ..TransactionBuilder::default()
                },
                &connection,
            )
            .expect("Could not create transaction");
        }

        // Drift the stored amount, then recompute it from the linked rows.
        connection
            .execute("UPDATE goal SET current_amount = 9999 WHERE id = ?1", [goal.id])
            .unwrap();
        recompute_goal_amount(goal.id, &connection).expect("Could not recompute goal");

        let goal = get_goal(goal.id, &connection).expect("Could not get goal");
        assert_eq!(goal.current_amount, 350.0);
    }
}
