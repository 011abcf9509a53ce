//! Database operations for shopping items.

use rusqlite::Connection;

use crate::{
    Error,
    dates::Month,
    db::{delete_row, ensure_updated},
    shopping::core::{NewShoppingItem, ShoppingItem, ShoppingItemId, map_row_to_shopping_item},
};

const SELECT_SHOPPING_ITEM: &str = "SELECT
        shopping_item.id,
        shopping_item.name,
        shopping_item.quantity,
        shopping_item.estimated_price,
        shopping_item.notes,
        shopping_item.category_id,
        shopping_category.name,
        shopping_item.month
    FROM shopping_item
    INNER JOIN shopping_category ON shopping_category.id = shopping_item.category_id";

/// Retrieve shopping items most recent month first, optionally only those for `month`.
pub fn list_shopping_items(
    month: Option<Month>,
    connection: &Connection,
) -> Result<Vec<ShoppingItem>, Error> {
    let (start, end) = match month.map(Month::date_range) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    connection
        .prepare(&format!(
            "{SELECT_SHOPPING_ITEM}
            WHERE (?1 IS NULL OR shopping_item.month >= ?1)
                AND (?2 IS NULL OR shopping_item.month < ?2)
            ORDER BY shopping_item.month DESC, shopping_item.id ASC;"
        ))?
        .query_map((start, end), map_row_to_shopping_item)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Retrieve a single shopping item by ID.
pub fn get_shopping_item(id: ShoppingItemId, connection: &Connection) -> Result<ShoppingItem, Error> {
    connection
        .prepare(&format!("{SELECT_SHOPPING_ITEM} WHERE shopping_item.id = :id;"))?
        .query_row(&[(":id", &id)], map_row_to_shopping_item)
        .map_err(Error::from)
}

/// Create a shopping item and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidReference] if the shopping category does not exist.
pub fn create_shopping_item(
    item: &NewShoppingItem,
    connection: &Connection,
) -> Result<ShoppingItem, Error> {
    connection.execute(
        "INSERT INTO shopping_item (name, quantity, estimated_price, notes, category_id, month)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            &item.name,
            item.quantity,
            item.estimated_price,
            &item.notes,
            item.category_id,
            item.month.first_day(),
        ),
    )?;

    get_shopping_item(connection.last_insert_rowid(), connection)
}

/// Overwrite the shopping item with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no shopping item with `id` or
/// [Error::InvalidReference] if the shopping category does not exist.
pub fn update_shopping_item(
    id: ShoppingItemId,
    item: &NewShoppingItem,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE shopping_item
        SET name = ?1, quantity = ?2, estimated_price = ?3, notes = ?4, category_id = ?5, month = ?6
        WHERE id = ?7",
        (
            &item.name,
            item.quantity,
            item.estimated_price,
            &item.notes,
            item.category_id,
            item.month.first_day(),
            id,
        ),
    )?;

    ensure_updated(rows_affected)
}

/// Delete the shopping item with `id`.
pub fn delete_shopping_item(id: ShoppingItemId, connection: &Connection) -> Result<(), Error> {
    delete_row("shopping_item", id, connection)
}
