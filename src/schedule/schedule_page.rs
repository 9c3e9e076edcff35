//! The page listing scheduled and recurring transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_OVERDUE_STYLE,
        STATUS_BADGE_PAID_STYLE, STATUS_BADGE_PENDING_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    schedule::{Recurrence, get_scheduled_transactions},
    timezone::today,
    transaction::{Transaction, TransactionStatus},
};

/// How a scheduled row is displayed. Overdue is derived, not stored: a
/// pending row whose due date has passed renders as overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DisplayStatus {
    Paid,
    Pending,
    Overdue,
}

pub(crate) fn display_status(transaction: &Transaction, today: Date) -> DisplayStatus {
    match transaction.status {
        TransactionStatus::Paid => DisplayStatus::Paid,
        TransactionStatus::Pending if transaction.date < today => DisplayStatus::Overdue,
        TransactionStatus::Pending => DisplayStatus::Pending,
    }
}

/// The state needed for the schedule page.
#[derive(Debug, Clone)]
pub struct SchedulePageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SchedulePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the schedule page with every scheduled transaction and its status.
pub async fn get_schedule_page(State(state): State<SchedulePageState>) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_scheduled_transactions(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve schedule: {error}"))?
    };

    Ok(schedule_view(&transactions, today(&state.local_timezone)).into_response())
}

pub(crate) fn status_badge(status: DisplayStatus) -> Markup {
    html!(
        @match status {
            DisplayStatus::Paid => { span class=(STATUS_BADGE_PAID_STYLE) { "Paid" } }
            DisplayStatus::Pending => { span class=(STATUS_BADGE_PENDING_STYLE) { "Pending" } }
            DisplayStatus::Overdue => { span class=(STATUS_BADGE_OVERDUE_STYLE) { "Overdue" } }
        }
    )
}

fn schedule_row(transaction: &Transaction, today: Date) -> Markup {
    let pay_url = endpoints::format_endpoint(endpoints::PAY_SCHEDULE, transaction.id);
    let close_url = endpoints::format_endpoint(endpoints::CLOSE_SCHEDULE, transaction.id);
    let status = display_status(transaction, today);
    let can_close =
        !transaction.closed && transaction.recurrence != Recurrence::Once;

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(reference) = &transaction.reference {
                    (reference)
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                (transaction.recurrence)

                @if transaction.closed {
                    " (closed)"
                }
            }

            td class=(TABLE_CELL_STYLE) { (status_badge(status)) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    @if status != DisplayStatus::Paid {
                        button
                            hx-post=(pay_url)
                            hx-target-error="#alert-container"
                            class=(LINK_STYLE)
                        {
                            "Mark Paid"
                        }
                    }

                    @if can_close {
                        button
                            hx-post=(close_url)
                            hx-confirm="Stop this schedule from repeating?"
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Close"
                        }
                    }
                }
            }
        }
    )
}

fn schedule_view(transactions: &[Transaction], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::SCHEDULE_VIEW).into_html();
    let new_schedule_route = endpoints::NEW_SCHEDULE_VIEW;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Schedule" }

                    a href=(new_schedule_route) class=(LINK_STYLE)
                    {
                        "Schedule Transaction"
                    }
                }

                section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Due" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Reference" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Repeats" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (schedule_row(transaction, today))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "Nothing scheduled yet. "
                                        a href=(new_schedule_route) class=(LINK_STYLE)
                                        {
                                            "Schedule your first transaction"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Schedule", &[], &content)
}
