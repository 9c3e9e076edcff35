//! The dashboard page: monthly summary cards, the net income chart, and the
//! next few scheduled payments.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    account::get_total_account_balance,
    dashboard::{
        aggregation::{
            CashFlow, MonthSummary, get_paid_cash_flows_since, monthly_series,
            subtract_whole_months, summarize_month,
        },
        charts::{DashboardChart, charts_script, net_income_chart},
    },
    endpoints,
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    schedule::{display_status, get_scheduled_transactions, status_badge},
    timezone::today,
    transaction::{Transaction, TransactionStatus},
};

/// How many months the net income chart looks back, including the current one.
const CHART_MONTHS: u32 = 12;

/// How many upcoming scheduled payments the dashboard lists.
const UPCOMING_LIMIT: usize = 5;

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = today(&state.local_timezone);
    // Day one is always a valid day of the month.
    let month_start = today.replace_day(1).unwrap();
    let window_start = subtract_whole_months(month_start, CHART_MONTHS - 1);

    let (cash_flows, total_balance, upcoming) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let cash_flows = get_paid_cash_flows_since(window_start, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve cash flows: {error}"))?;
        let total_balance = get_total_account_balance(&connection).inspect_err(|error| {
            tracing::error!("Could not calculate total account balance: {error}")
        })?;
        let upcoming: Vec<Transaction> = get_scheduled_transactions(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve schedule: {error}"))?
            .into_iter()
            .filter(|transaction| {
                transaction.status == TransactionStatus::Pending && !transaction.closed
            })
            .take(UPCOMING_LIMIT)
            .collect();

        (cash_flows, total_balance, upcoming)
    };

    let summary = summarize_month(&cash_flows, month_start);

    Ok(dashboard_view(summary, total_balance, &cash_flows, window_start, &upcoming, today)
        .into_response())
}

fn summary_card(label: &str, amount: f64) -> Markup {
    html!(
        article class="p-4 bg-white border border-gray-200 rounded-lg shadow-sm
            dark:bg-gray-800 dark:border-gray-700"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }

            p class="text-2xl font-bold" { (format_currency(amount)) }
        }
    )
}

fn summary_cards(summary: MonthSummary, total_balance: f64) -> Markup {
    html!(
        section class="grid grid-cols-2 xl:grid-cols-4 gap-4 w-full"
        {
            (summary_card("Income this month", summary.income))
            (summary_card("Expenses this month", summary.expenses))
            (summary_card("Net this month", summary.net))
            (summary_card("Total balance", total_balance))
        }
    )
}

fn upcoming_table(upcoming: &[Transaction], today: Date) -> Markup {
    let table_row = |transaction: &Transaction| {
        let status = display_status(transaction, today);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                td class=(TABLE_CELL_STYLE) { (status_badge(status)) }
            }
        )
    };

    html!(
        section class="w-full space-y-2"
        {
            div class="flex items-baseline justify-between"
            {
                h2 class="text-lg font-semibold" { "Upcoming payments" }

                (link(endpoints::SCHEDULE_VIEW, "View schedule"))
            }

            @if upcoming.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "Nothing due." }
            } @else {
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
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        }
                    }

                    tbody
                    {
                        @for transaction in upcoming {
                            (table_row(transaction))
                        }
                    }
                }
            }
        }
    )
}

fn dashboard_view(
    summary: MonthSummary,
    total_balance: f64,
    cash_flows: &[CashFlow],
    window_start: Date,
    upcoming: &[Transaction],
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let chart = if cash_flows.is_empty() {
        None
    } else {
        let (labels, values) = monthly_series(cash_flows, window_start, CHART_MONTHS);
        Some(DashboardChart {
            id: "net-income-chart",
            options: net_income_chart(labels, values).to_string(),
        })
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                (summary_cards(summary, total_balance))

                @match &chart {
                    Some(chart) => {
                        section
                            id=(chart.id)
                            class="w-full min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                    None => {
                        p class="text-center text-gray-500 dark:text-gray-400"
                        {
                            "Charts will show up here once you add some transactions. "
                            "You can add transactions "
                            (link(endpoints::NEW_TRANSACTION_VIEW, "here"))
                            "."
                        }
                    }
                }

                (upcoming_table(upcoming, today))
            }
        }
    );

    let scripts: Vec<HeadElement> = match &chart {
        Some(chart) => vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(std::slice::from_ref(chart)),
        ],
        None => Vec::new(),
    };

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod dashboard_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::Duration;

    use crate::{
        db::initialize,
        schedule::{Recurrence, create_scheduled_transaction},
        test_utils::{assert_valid_html, parse_html_document},
        timezone::today,
        transaction::{TransactionBuilder, TransactionKind, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DashboardState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_cards_and_chart() {
        let state = get_test_state();
        let today = today("Etc/UTC");
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TransactionBuilder {
                    kind: TransactionKind::Income,
                    amount: 2000.0,
                    date: today,
                    description: "Salary".to_string(),
                    ..TransactionBuilder::default()
                },
                &connection,
            )
            .unwrap();
            create_transaction(
                TransactionBuilder {
                    kind: TransactionKind::Expense,
                    amount: -150.0,
                    date: today,
                    description: "Groceries".to_string(),
                    ..TransactionBuilder::default()
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let chart_selector = Selector::parse("#net-income-chart").unwrap();
        assert!(
            html.select(&chart_selector).next().is_some(),
            "want the net income chart container in {}",
            html.html()
        );

        let text = html.html();
        assert!(text.contains("$2,000.00"));
        assert!(text.contains("-$150.00"));
        assert!(text.contains("$1,850.00"));
    }

    #[tokio::test]
    async fn shows_prompt_when_no_data() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let chart_selector = Selector::parse("#net-income-chart").unwrap();
        assert!(html.select(&chart_selector).next().is_none());
        assert!(html.html().contains("Charts will show up here"));
    }

    #[tokio::test]
    async fn lists_upcoming_payments_with_overdue_badge() {
        let state = get_test_state();
        let yesterday = today("Etc/UTC") - Duration::days(1);
        {
            let connection = state.db_connection.lock().unwrap();
            create_scheduled_transaction(
                TransactionBuilder {
                    kind: TransactionKind::Expense,
                    amount: -75.0,
                    date: yesterday,
                    description: "Internet bill".to_string(),
                    recurrence: Recurrence::Monthly,
                    ..TransactionBuilder::default()
                },
                None,
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let text = html.html();
        assert!(text.contains("Internet bill"));
        assert!(text.contains("Overdue"));
    }
}
