//! Date arithmetic for recurring scheduled transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, util::days_in_year_month};

/// How often a scheduled transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// The transaction happens a single time and never spawns a successor.
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// The date of the next occurrence after `date`, or `None` for one-off
    /// transactions.
    ///
    /// Monthly advancement clamps to the last day of the target month, so the
    /// 31st of January advances to the 28th (or 29th) of February. Yearly
    /// advancement clamps February 29 to February 28 in non-leap years.
    pub fn next_occurrence(&self, date: Date) -> Option<Date> {
        match self {
            Recurrence::Once => None,
            Recurrence::Daily => Some(date + Duration::days(1)),
            Recurrence::Weekly => Some(date + Duration::days(7)),
            Recurrence::Monthly => Some(add_months(date, 1)),
            Recurrence::Yearly => {
                let year = date.year() + 1;
                let day = date.day().min(days_in_year_month(year, date.month()));

                // The day is clamped to a valid day of the month, so this
                // cannot fail for dates within the supported year range.
                Date::from_calendar_date(year, date.month(), day).ok()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Recurrence::Once),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            _ => Err(format!("unknown recurrence {s}")),
        }
    }
}

/// Add `months` calendar months to `date`, clamping the day to the last day
/// of the target month.
pub fn add_months(date: Date, months: u32) -> Date {
    let zero_based_month = date.month() as u32 - 1 + months;
    let year = date.year() + (zero_based_month / 12) as i32;
    // Month is always in 1..=12, so the conversion cannot fail.
    let month = time::Month::try_from((zero_based_month % 12 + 1) as u8)
        .unwrap_or(date.month());
    let day = date.day().min(days_in_year_month(year, month));

    Date::from_calendar_date(year, month, day).unwrap_or(date)
}
