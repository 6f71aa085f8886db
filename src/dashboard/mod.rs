//! Dashboard module
//!
//! Provides an overview page with the ledger's totals, the month-over-month
//! change of income and expenses, a monthly chart and the latest transactions.

mod cards;
mod chart;
mod handlers;

pub use handlers::get_dashboard_page;
