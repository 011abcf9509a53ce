//! Expenses and whether they have been paid.

mod api;
mod core;
mod db;
mod page;

pub use api::{
    create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
    toggle_expense_completion_endpoint, update_expense_endpoint,
};
pub use core::{Expense, create_expense_table};
pub use db::list_expenses;
pub use page::get_expenses_page;
