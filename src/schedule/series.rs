//! Series codes group the rows spawned from one schedule, and give each
//! installment a human-readable reference such as "12A".

use rusqlite::Connection;

use crate::Error;

/// Allocate the next unused series code.
///
/// Callers must hold an open SQLite transaction so that two concurrent
/// allocations serialize and cannot hand out the same code.
pub(crate) fn next_series_code(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(MAX(series), 0) + 1 FROM \"transaction\"",
            [],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// The reference for installment `index` (zero-based) of `series`.
///
/// Letters run A..Z and then extend like spreadsheet columns: AA, AB, and so
/// on, so large installment counts stay unique.
pub(crate) fn installment_reference(series: i64, index: u32) -> String {
    let mut letters = Vec::new();
    let mut remaining = index as i64;

    loop {
        letters.push(b'A' + (remaining % 26) as u8);
        remaining = remaining / 26 - 1;

        if remaining < 0 {
            break;
        }
    }

    letters.reverse();
    // The letters are built from ASCII in A-Z, so this cannot fail.
    let suffix = String::from_utf8_lossy(&letters);

    format!("{series}{suffix}")
}
