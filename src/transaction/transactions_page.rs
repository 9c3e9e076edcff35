//! The page that displays transactions as a paginated table.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    category::get_all_categories,
    database_id::DatabaseId,
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_PENDING_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    transaction::{Transaction, TransactionStatus, count_transactions, get_transaction_page},
};

/// Controls pagination of the transactions table.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// The page number to display. Starts from 1.
    pub page: Option<u64>,
    /// The maximum number of transactions to display per page.
    pub per_page: Option<u64>,
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Configuration for pagination controls.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render an overview of the user's transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query_params): Query<Pagination>,
) -> Result<Response, Error> {
    let current_page = query_params
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);
    let per_page = query_params
        .per_page
        .unwrap_or(state.pagination_config.default_page_size)
        .max(1);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction_count = count_transactions(&connection)?;
    let page_count = (transaction_count as f64 / per_page as f64).ceil() as u64;

    let limit = per_page as u32;
    let offset = ((current_page - 1) * per_page) as u32;
    let transactions = get_transaction_page(limit, offset, &connection)?;

    let category_names: HashMap<DatabaseId, String> = get_all_categories(&connection)?
        .into_iter()
        .map(|category| (category.id, category.name.as_ref().to_owned()))
        .collect();

    let indicators =
        create_pagination_indicators(current_page, page_count, state.pagination_config.max_pages);

    Ok(
        transactions_view(&transactions, &category_names, &indicators, per_page)
            .into_response(),
    )
}

fn transaction_row(
    transaction: &Transaction,
    category_names: &HashMap<DatabaseId, String>,
) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let confirm_message = "Are you sure you want to delete this transaction?";

    let category_name = transaction
        .category_id
        .and_then(|category_id| category_names.get(&category_id));

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }

            td class=(TABLE_CELL_STYLE)
            {
                (transaction.description)

                @if transaction.status == TransactionStatus::Pending {
                    " "
                    span class=(STATUS_BADGE_PENDING_STYLE) { "Pending" }
                }
            }

            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(name) = category_name {
                    span class=(CATEGORY_BADGE_STYLE) { (name) }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    )
}

fn pagination_nav(indicators: &[PaginationIndicator], per_page: u64) -> Markup {
    let page_url =
        |page: u64| format!("{}?page={page}&per_page={per_page}", endpoints::TRANSACTIONS_VIEW);

    html!(
        nav class="flex justify-center gap-2 py-4" aria-label="Transaction pages"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { "Previous" }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                    }
                    PaginationIndicator::CurrPage(page) => {
                        span class="font-bold text-gray-900 dark:text-white" { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span class="text-gray-500" { "..." }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { "Next" }
                    }
                }
            }
        }
    )
}

fn transactions_view(
    transactions: &[Transaction],
    category_names: &HashMap<DatabaseId, String>,
    indicators: &[PaginationIndicator],
    per_page: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let new_transaction_route = endpoints::NEW_TRANSACTION_VIEW;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(new_transaction_route) class=(LINK_STYLE)
                    {
                        "Create Transaction"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction, category_names))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions recorded yet. "
                                        a href=(new_transaction_route) class=(LINK_STYLE)
                                        {
                                            "Create your first transaction"
                                        }
                                    }
                                }
                            }
                        }
                    }

                    @if indicators.len() > 1 {
                        (pagination_nav(indicators, per_page))
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

#[cfg(test)]
mod transactions_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        pagination::PaginationConfig,
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{TransactionBuilder, TransactionKind, create_transaction},
    };

    use super::{Pagination, TransactionsPageState, get_transactions_page};

    fn get_transactions_page_state() -> TransactionsPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        TransactionsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        }
    }

    fn create_test_transactions(state: &TransactionsPageState, count: u32) {
        let connection = state.db_connection.lock().unwrap();

        for i in 0..count {
            create_transaction(
                TransactionBuilder {
                    kind: TransactionKind::Expense,
                    amount: -((i + 1) as f64),
                    date: date!(2024 - 06 - 01),
                    description: format!("Transaction {i}"),
                    ..TransactionBuilder::default()
                },
                &connection,
            )
            .expect("Could not create test transaction");
        }
    }

    #[tokio::test]
    async fn renders_transactions() {
        let state = get_transactions_page_state();
        create_test_transactions(&state, 3);

        let response = get_transactions_page(
            State(state),
            Query(Pagination {
                page: None,
                per_page: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Transaction 0"));
        assert!(text.contains("Transaction 2"));
        assert!(text.contains("-$2.00"));
    }

    #[tokio::test]
    async fn second_page_shows_remaining_transactions() {
        let state = get_transactions_page_state();
        create_test_transactions(&state, 3);

        let response = get_transactions_page(
            State(state),
            Query(Pagination {
                page: Some(2),
                per_page: Some(2),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        // Newest first, so the last page holds the oldest row (lowest id).
        let text = html.html();
        assert!(text.contains("Transaction 0"), "want oldest row in {text}");
        assert!(!text.contains("Transaction 2"), "newest row should be on page 1");
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = get_transactions_page_state();

        let response = get_transactions_page(
            State(state),
            Query(Pagination {
                page: None,
                per_page: None,
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("No transactions recorded yet"));
    }
}
