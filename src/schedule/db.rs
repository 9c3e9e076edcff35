//! Database operations for scheduled transactions: creating them (optionally
//! in installments), marking them paid, and closing them.

use rusqlite::Connection;

use crate::{
    Error,
    goal::adjust_goal_amount,
    schedule::{
        Recurrence, add_months,
        series::{installment_reference, next_series_code},
    },
    transaction::{
        TRANSACTION_COLUMNS, Transaction, TransactionBuilder, TransactionKind, TransactionStatus,
        get_transaction, insert_transaction_row, map_transaction_row, validate_amount,
        validate_references,
    },
};

/// What happened when a scheduled transaction was marked paid.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// The row was already paid, so nothing changed.
    AlreadyPaid,
    /// The row was marked paid, possibly spawning the next occurrence.
    Paid { successor: Option<Transaction> },
}

/// Create a scheduled transaction, or a whole series of installments.
///
/// With an installment count of N >= 2, exactly N pending rows are inserted,
/// each dated one calendar month after the previous (clamped to month ends)
/// and referenced `<series>A`, `<series>B`, and so on. The rows carry
/// [Recurrence::Once] since the series is materialized up front.
///
/// Otherwise a single pending row is inserted with the builder's recurrence
/// and a fresh series code.
///
/// Either way the write is one SQLite transaction; any failure rolls back
/// every row.
///
/// # Errors
///
/// Returns an [Error::ScheduledReminder] if the builder's kind is
/// [TransactionKind::Reminder], an [Error::InvalidInstallmentCount] if the
/// installment count is 1 or 0, and the same errors as
/// [crate::transaction::create_transaction] for invalid amounts or links.
pub fn create_scheduled_transaction(
    builder: TransactionBuilder,
    installments: Option<u32>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Scheduled transactions must carry a non-zero amount.
    if builder.kind == TransactionKind::Reminder {
        return Err(Error::ScheduledReminder);
    }

    validate_amount(builder.kind, builder.amount)?;

    if let Some(count) = installments
        && count < 2
    {
        return Err(Error::InvalidInstallmentCount(count));
    }

    let sql_transaction = connection.unchecked_transaction()?;

    validate_references(&builder, &sql_transaction)?;
    let series = next_series_code(&sql_transaction)?;

    let transactions = match installments {
        Some(count) => {
            let mut transactions = Vec::with_capacity(count as usize);
            let mut date = builder.date;

            for index in 0..count {
                if index > 0 {
                    date = add_months(date, 1);
                }

                let row = TransactionBuilder {
                    date,
                    status: TransactionStatus::Pending,
                    scheduled: true,
                    recurrence: Recurrence::Once,
                    series: Some(series),
                    reference: Some(installment_reference(series, index)),
                    ..builder.clone()
                };
                transactions.push(insert_transaction_row(&row, &sql_transaction)?);
            }

            transactions
        }
        None => {
            let row = TransactionBuilder {
                status: TransactionStatus::Pending,
                scheduled: true,
                series: Some(series),
                reference: None,
                ..builder
            };

            vec![insert_transaction_row(&row, &sql_transaction)?]
        }
    };

    sql_transaction.commit()?;

    Ok(transactions)
}

/// Mark a scheduled transaction as paid.
///
/// Marking an already-paid row again is a no-op success, so a double-submitted
/// request cannot spawn duplicate successors. Otherwise, inside one SQLite
/// transaction:
/// - the row's status is set to paid,
/// - a linked goal's current amount is adjusted by the row's amount,
/// - unless the recurrence is [Recurrence::Once] or the row is closed, the
///   next occurrence is inserted as a pending row with a fresh series code
///   and copied fields.
///
/// # Errors
///
/// Returns an [Error::NotScheduled] if the row is not a scheduled
/// transaction, or an [Error::NotFound] if it does not exist.
pub fn mark_transaction_paid(
    transaction_id: i64,
    connection: &Connection,
) -> Result<PaymentOutcome, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let row = get_transaction(transaction_id, &sql_transaction)?;

    if !row.scheduled {
        return Err(Error::NotScheduled);
    }

    if row.status == TransactionStatus::Paid {
        return Ok(PaymentOutcome::AlreadyPaid);
    }

    sql_transaction.execute(
        "UPDATE \"transaction\" SET status = 'paid' WHERE id = ?1",
        [transaction_id],
    )?;

    if let Some(goal_id) = row.goal_id {
        adjust_goal_amount(goal_id, row.amount, &sql_transaction)?;
    }

    let successor = if row.closed || row.recurrence == Recurrence::Once {
        None
    } else if let Some(next_date) = row.recurrence.next_occurrence(row.date) {
        let series = next_series_code(&sql_transaction)?;
        let builder = TransactionBuilder {
            kind: row.kind,
            amount: row.amount,
            date: next_date,
            description: row.description.clone(),
            category_id: row.category_id,
            account_id: row.account_id,
            goal_id: row.goal_id,
            dependent_id: row.dependent_id,
            status: TransactionStatus::Pending,
            scheduled: true,
            recurrence: row.recurrence,
            series: Some(series),
            reference: None,
            closed: false,
        };

        Some(insert_transaction_row(&builder, &sql_transaction)?)
    } else {
        None
    };

    sql_transaction.commit()?;

    Ok(PaymentOutcome::Paid { successor })
}

/// Close a schedule so that marking it paid never spawns a successor.
///
/// # Errors
///
/// Returns an [Error::NotScheduled] if the row is not a scheduled
/// transaction, or an [Error::NotFound] if it does not exist.
pub fn close_schedule(transaction_id: i64, connection: &Connection) -> Result<(), Error> {
    let row = get_transaction(transaction_id, connection)?;

    if !row.scheduled {
        return Err(Error::NotScheduled);
    }

    connection.execute(
        "UPDATE \"transaction\" SET closed = 1 WHERE id = ?1",
        [transaction_id],
    )?;

    Ok(())
}

/// All scheduled transactions, soonest due first.
pub fn get_scheduled_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
        WHERE scheduled = 1 ORDER BY date ASC, id ASC"
    );

    connection
        .prepare(&query)?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}
