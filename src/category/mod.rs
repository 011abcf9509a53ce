//! Categories for grouping expenses and shopping items.

mod api;
mod core;
mod db;

pub use api::{
    create_expense_category_endpoint, create_shopping_category_endpoint,
    delete_expense_category_endpoint, delete_shopping_category_endpoint,
    list_expense_categories_endpoint, list_shopping_categories_endpoint,
    update_expense_category_endpoint, update_shopping_category_endpoint,
};
pub use core::{Category, CategoryId, CategoryKind, create_category_tables};
pub use db::list_categories;

#[cfg(test)]
pub use db::create_category;
