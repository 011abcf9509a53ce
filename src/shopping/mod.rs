//! The shopping list: items to buy each month, grouped by shopping category.

mod api;
mod core;
mod db;
mod page;

pub use api::{
    create_shopping_item_endpoint, delete_shopping_item_endpoint, list_shopping_items_endpoint,
    update_shopping_item_endpoint,
};
pub use core::{ShoppingItem, create_shopping_item_table};
pub use page::get_shopping_list_page;
