//! Dashboard module
//!
//! Provides an overview of one month: the income, what was spent and the
//! balance left over, with the month's spending broken down by category.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use handlers::{get_dashboard_endpoint, get_dashboard_page};
