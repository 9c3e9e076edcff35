//! The dashboard: monthly summary cards, a net income chart, and the next few
//! scheduled payments.

mod aggregation;
mod charts;
mod dashboard_page;

pub use dashboard_page::{DashboardState, get_dashboard_page};
