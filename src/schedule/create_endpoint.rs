//! The endpoint for scheduling a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    database_id::{DatabaseId, deserialize_optional_id},
    schedule::{Recurrence, create_scheduled_transaction},
    transaction::{TransactionBuilder, TransactionKind, TransactionStatus},
};

/// The form data for scheduling a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleForm {
    pub kind: TransactionKind,
    /// The amount as a positive dollar value; the sign is derived from the
    /// kind.
    pub amount: f64,
    /// The first due date.
    pub date: Date,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub goal_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub dependent_id: Option<DatabaseId>,
    pub recurrence: Recurrence,
    /// Split into this many monthly payments instead of repeating.
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub installments: Option<u32>,
}

impl ScheduleForm {
    fn into_builder(self) -> TransactionBuilder {
        let amount = match self.kind {
            TransactionKind::Income => self.amount.abs(),
            TransactionKind::Expense => -self.amount.abs(),
            TransactionKind::Reminder => 0.0,
        };

        TransactionBuilder {
            kind: self.kind,
            amount,
            date: self.date,
            description: self.description,
            category_id: self.category_id,
            account_id: self.account_id,
            goal_id: self.goal_id,
            dependent_id: self.dependent_id,
            status: TransactionStatus::Pending,
            scheduled: true,
            recurrence: self.recurrence,
            ..TransactionBuilder::default()
        }
    }
}

/// Treat a missing or empty installment count as no installments.
fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The state needed to schedule a transaction.
#[derive(Debug, Clone)]
pub struct CreateScheduleState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateScheduleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for scheduling a transaction, optionally in installments.
/// Redirects to the schedule view on success.
pub async fn create_schedule_endpoint(
    State(state): State<CreateScheduleState>,
    Form(form): Form<ScheduleForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let installments = form.installments;

    match create_scheduled_transaction(form.into_builder(), installments, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SCHEDULE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not schedule transaction: {error}");
            error.into_alert_response()
        }
    }
}
