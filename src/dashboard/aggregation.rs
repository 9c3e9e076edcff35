//! Aggregation of paid transactions into the monthly figures the dashboard
//! displays.

use std::collections::HashMap;

use rusqlite::Connection;
use time::Date;

use crate::Error;

/// A paid transaction reduced to the two fields the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CashFlow {
    pub date: Date,
    pub amount: f64,
}

/// Paid transactions on or after `start`, oldest first. Pending rows are
/// excluded: money that has not moved yet does not belong in the totals.
pub(super) fn get_paid_cash_flows_since(
    start: Date,
    connection: &Connection,
) -> Result<Vec<CashFlow>, Error> {
    connection
        .prepare(
            "SELECT date, amount FROM \"transaction\"
            WHERE status = 'paid' AND date >= ?1
            ORDER BY date ASC",
        )?
        .query_map([start], |row| {
            Ok(CashFlow {
                date: row.get(0)?,
                amount: row.get(1)?,
            })
        })?
        .map(|maybe_cash_flow| maybe_cash_flow.map_err(|error| error.into()))
        .collect()
}

/// Income, expenses and net for a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct MonthSummary {
    /// The sum of positive amounts. Always non-negative.
    pub income: f64,
    /// The sum of negative amounts. Always non-positive.
    pub expenses: f64,
    /// `income + expenses`.
    pub net: f64,
}

/// Summarize the cash flows that fall within the month starting at
/// `month_start`.
pub(super) fn summarize_month(cash_flows: &[CashFlow], month_start: Date) -> MonthSummary {
    let month_end = add_whole_months(month_start, 1);

    let mut income = 0.0;
    let mut expenses = 0.0;

    for cash_flow in cash_flows {
        if cash_flow.date < month_start || cash_flow.date >= month_end {
            continue;
        }

        if cash_flow.amount > 0.0 {
            income += cash_flow.amount;
        } else {
            expenses += cash_flow.amount;
        }
    }

    MonthSummary {
        income,
        expenses,
        net: income + expenses,
    }
}

/// Net amounts per month over the `month_count` months ending at the month of
/// `window_start + month_count - 1`. Months with no cash flows contribute
/// zero so the chart's x-axis has no gaps.
pub(super) fn monthly_series(
    cash_flows: &[CashFlow],
    window_start: Date,
    month_count: u32,
) -> (Vec<String>, Vec<f64>) {
    let mut totals: HashMap<Date, f64> = HashMap::new();

    for cash_flow in cash_flows {
        // Day one is always a valid day of the month.
        let month = cash_flow.date.replace_day(1).unwrap();
        *totals.entry(month).or_insert(0.0) += cash_flow.amount;
    }

    let months: Vec<Date> = (0..month_count)
        .map(|offset| add_whole_months(window_start, offset))
        .collect();

    let labels = months.iter().map(|month| month_label(*month)).collect();
    let values = months
        .iter()
        .map(|month| totals.get(month).copied().unwrap_or(0.0))
        .collect();

    (labels, values)
}

/// The first day of the month `months` whole months after `date`'s month.
pub(super) fn add_whole_months(date: Date, months: u32) -> Date {
    let zero_based_month = date.month() as u32 - 1 + months;
    let year = date.year() + (zero_based_month / 12) as i32;
    // Month is always in 1..=12, so neither conversion can fail.
    let month = time::Month::try_from((zero_based_month % 12 + 1) as u8).unwrap();
    Date::from_calendar_date(year, month, 1).unwrap()
}

/// The first day of the month `months` whole months before `date`'s month.
pub(super) fn subtract_whole_months(date: Date, months: u32) -> Date {
    let total = date.year() * 12 + date.month() as i32 - 1 - months as i32;
    let year = total.div_euclid(12);
    // Month is always in 1..=12, so neither conversion can fail.
    let month = time::Month::try_from((total.rem_euclid(12) + 1) as u8).unwrap();
    Date::from_calendar_date(year, month, 1).unwrap()
}

fn month_label(month: Date) -> String {
    use time::Month;

    match month.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
    .to_string()
}
