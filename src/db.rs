//! Creates the application's tables and holds helpers shared by the
//! per-record database modules.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, category::create_category_tables, database_id::DatabaseId,
    expense::create_expense_table, family_member::create_family_member_table,
    income::create_income_table, saving_goal::create_saving_goal_table,
    shopping::create_shopping_item_table,
};

/// Create all of the application's tables if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, the tables are
/// created in dependency order inside a single exclusive transaction, so
/// calling this on an already initialized database is a no-op.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_family_member_table(&transaction)?;
    create_category_tables(&transaction)?;
    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;
    create_shopping_item_table(&transaction)?;
    create_saving_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock has been poisoned.
pub(crate) fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Delete the row with `id` from `table`.
///
/// Deleting a row that does not exist is not an error, the caller gets the
/// same result as if the row had been deleted.
///
/// # Errors
/// Returns [Error::StillReferenced] if another table still refers to the row,
/// or [Error::SqlError] for any other SQL error.
pub(crate) fn delete_row(
    table: &'static str,
    id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])
        .map_err(|error| match Error::from(error) {
            Error::InvalidReference => Error::StillReferenced,
            error => error,
        })?;

    if rows_affected == 0 {
        tracing::debug!("DELETE on {table} with id {id} did not match any rows");
    }

    Ok(())
}

/// Turn the number of rows touched by an `UPDATE` into a result.
///
/// # Errors
/// Returns [Error::NotFound] if no rows were updated.
pub(crate) fn ensure_updated(rows_affected: usize) -> Result<(), Error> {
    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
