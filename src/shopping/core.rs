use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    database_id::DatabaseId,
    dates::{Month, iso_date},
    input::{optional_id, optional_integer, optional_number},
    search::Searchable,
    validation::{MIN_NAME_LENGTH, at_least, optional_text, required, required_id, required_text},
};

pub type ShoppingItemId = DatabaseId;

/// Something to buy in a given month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: ShoppingItemId,
    pub name: String,
    pub quantity: i64,
    /// The expected price for the whole quantity.
    pub estimated_price: f64,
    pub notes: Option<String>,
    pub category_id: CategoryId,
    pub category_name: String,
    /// The first day of the month the item is to be bought in.
    #[serde(with = "iso_date")]
    pub month: Date,
}

impl Searchable for ShoppingItem {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.category_name.as_str()];
        fields.extend(self.notes.as_deref());
        fields
    }
}

/// A validated shopping item that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShoppingItem {
    pub name: String,
    pub quantity: i64,
    pub estimated_price: f64,
    pub notes: Option<String>,
    pub category_id: CategoryId,
    pub month: Month,
}

/// The JSON body for creating or updating a shopping item.
#[derive(Debug, Default, Deserialize)]
pub struct ShoppingItemPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<ShoppingItemId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_integer")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub estimated_price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub month: Option<String>,
}

impl ShoppingItemPayload {
    /// Check the payload and convert it into a [NewShoppingItem].
    ///
    /// # Errors
    /// Returns an error if a required field is missing, the name is too
    /// short, the quantity is less than one or the price is negative.
    pub fn validate(self) -> Result<NewShoppingItem, Error> {
        let name = required_text(self.name, "name", MIN_NAME_LENGTH)?;
        let quantity = required(self.quantity, "quantity")?;

        if quantity < 1 {
            return Err(Error::InvalidField {
                field: "quantity",
                reason: "must be 1 or greater".to_owned(),
            });
        }

        let estimated_price = at_least(
            required(self.estimated_price, "estimated_price")?,
            0.0,
            "estimated_price",
        )?;
        let category_id = required_id(self.category_id, "category_id")?;
        let month = Month::parse_optional(self.month.as_deref())?
            .ok_or(Error::MissingField("month"))?;

        Ok(NewShoppingItem {
            name,
            quantity,
            estimated_price,
            notes: optional_text(self.notes),
            category_id,
            month,
        })
    }
}

pub fn create_shopping_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS shopping_item (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            estimated_price REAL NOT NULL,
            notes TEXT,
            category_id INTEGER NOT NULL REFERENCES shopping_category(id) ON DELETE RESTRICT,
            month TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_shopping_item_month ON shopping_item(month);",
    )?;

    Ok(())
}

/// Map a row of `id, name, quantity, estimated_price, notes, category_id,
/// category_name, month` to a [ShoppingItem].
pub fn map_row_to_shopping_item(row: &Row) -> Result<ShoppingItem, rusqlite::Error> {
    Ok(ShoppingItem {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        estimated_price: row.get(3)?,
        notes: row.get(4)?,
        category_id: row.get(5)?,
        category_name: row.get(6)?,
        month: row.get(7)?,
    })
}
