//! Database operations for expense and shopping categories.

use rusqlite::Connection;

use crate::{
    Error,
    category::core::{Category, CategoryId, CategoryKind, map_row_to_category},
    db::{delete_row, ensure_updated},
};

/// Retrieve all categories of `kind` ordered alphabetically by name.
pub fn list_categories(kind: CategoryKind, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, name FROM {} ORDER BY name ASC, id ASC;",
            kind.table()
        ))?
        .query_map([], map_row_to_category)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Create a category and return it with its generated ID.
pub fn create_category(
    kind: CategoryKind,
    name: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        &format!("INSERT INTO {} (name) VALUES (?1);", kind.table()),
        (name,),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: name.to_owned(),
    })
}

/// Rename the category with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no category of `kind` with `id`.
pub fn update_category(
    kind: CategoryKind,
    id: CategoryId,
    name: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("UPDATE {} SET name = ?1 WHERE id = ?2", kind.table()),
        (name, id),
    )?;

    ensure_updated(rows_affected)
}

/// Delete the category with `id`.
///
/// # Errors
/// Returns [Error::StillReferenced] if expenses or shopping items still use the category.
pub fn delete_category(
    kind: CategoryKind,
    id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    delete_row(kind.table(), id, connection)
}
