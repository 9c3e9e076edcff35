//! Scheduled and recurring transactions: creating them (optionally in
//! installments), advancing them when paid, and the page that lists them.

mod close_endpoint;
mod create_endpoint;
mod create_page;
mod db;
mod pay_endpoint;
mod recurrence;
mod schedule_page;
mod series;

pub use close_endpoint::close_schedule_endpoint;
pub use create_endpoint::{ScheduleForm, create_schedule_endpoint};
pub use create_page::get_create_schedule_page;
pub use db::{
    PaymentOutcome, close_schedule, create_scheduled_transaction, get_scheduled_transactions,
    mark_transaction_paid,
};
pub use pay_endpoint::pay_schedule_endpoint;
pub use recurrence::{Recurrence, add_months};
pub use schedule_page::get_schedule_page;
pub(crate) use schedule_page::{DisplayStatus, display_status, status_badge};
