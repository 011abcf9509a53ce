//! Income earned by family members, recorded per month.

mod api;
mod core;
mod db;
mod page;

pub use api::{
    create_income_endpoint, delete_income_endpoint, list_income_endpoint, update_income_endpoint,
};
pub use core::{Income, create_income_table};
pub use db::list_income;
pub use page::get_income_page;
