use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    input::optional_id,
    validation::{MIN_NAME_LENGTH, required_text},
};

pub type CategoryId = DatabaseId;

/// Which list of categories a category belongs to.
///
/// Expense categories and shopping categories have the same shape but are
/// stored in separate tables and cannot be used in place of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Expense,
    Shopping,
}

impl CategoryKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense_category",
            CategoryKind::Shopping => "shopping_category",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            CategoryKind::Expense => "Expense category",
            CategoryKind::Shopping => "Shopping category",
        }
    }
}

/// A named group of expenses or shopping items, e.g. "Utilities" or "Groceries".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// The JSON body for creating or updating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<CategoryId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryPayload {
    /// Check the payload and return the trimmed category name.
    ///
    /// # Errors
    /// Returns an error if the name is missing or shorter than two characters.
    pub fn validate(self) -> Result<String, Error> {
        required_text(self.name, "name", MIN_NAME_LENGTH)
    }
}

/// Create the expense and shopping category tables.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shopping_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );",
    )?;

    Ok(())
}

pub fn map_row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
