//! Database operations for expenses.

use rusqlite::Connection;
use time::{OffsetDateTime, UtcOffset};
use time_tz::Tz;

use crate::{
    Error,
    dates::Month,
    db::{delete_row, ensure_updated},
    expense::core::{Expense, ExpenseId, NewExpense, map_row_to_expense},
};

const SELECT_EXPENSE: &str = "SELECT
        expense.id,
        expense.category_id,
        expense_category.name,
        expense.name,
        expense.estimated_amount,
        expense.actual_amount,
        expense.completed_at,
        expense.created_at
    FROM expense
    INNER JOIN expense_category ON expense_category.id = expense.category_id";

/// Retrieve expenses newest first, optionally only those created in `month`.
///
/// `local_timezone` is the household's timezone and decides where one month
/// ends and the next begins.
pub fn list_expenses(
    month: Option<Month>,
    local_timezone: &Tz,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let (start, end) = match month.map(|month| month.utc_range(local_timezone)) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    connection
        .prepare(&format!(
            "{SELECT_EXPENSE}
            WHERE (?1 IS NULL OR expense.created_at >= ?1)
                AND (?2 IS NULL OR expense.created_at < ?2)
            ORDER BY expense.created_at DESC, expense.id DESC;"
        ))?
        .query_map((start, end), map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve a single expense by ID.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!("{SELECT_EXPENSE} WHERE expense.id = :id;"))?
        .query_row(&[(":id", &id)], map_row_to_expense)
        .map_err(Error::from)
}

/// Create an expense recorded at `created_at` and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidReference] if the expense category does not exist.
pub fn create_expense(
    expense: &NewExpense,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (category_id, name, estimated_amount, actual_amount, completed_at, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            expense.category_id,
            &expense.name,
            expense.estimated_amount,
            expense.actual_amount,
            expense.completed_at.map(to_utc),
            to_utc(created_at),
        ),
    )?;

    get_expense(connection.last_insert_rowid(), connection)
}

/// Overwrite the expense with `id`. The time it was recorded is kept.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expense with `id` or
/// [Error::InvalidReference] if the expense category does not exist.
pub fn update_expense(
    id: ExpenseId,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense
        SET category_id = ?1, name = ?2, estimated_amount = ?3, actual_amount = ?4, completed_at = ?5
        WHERE id = ?6",
        (
            expense.category_id,
            &expense.name,
            expense.estimated_amount,
            expense.actual_amount,
            expense.completed_at.map(to_utc),
            id,
        ),
    )?;

    ensure_updated(rows_affected)
}

/// Mark the expense with `id` as completed at `now`, or clear its completion.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expense with `id`, or
/// [Error::CompletionRequiresActualAmount] if `completed` is set on an
/// expense without an actual amount.
pub fn set_completion(
    id: ExpenseId,
    completed: bool,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = get_expense(id, connection)?;

    if completed && expense.actual_amount.is_none() {
        return Err(Error::CompletionRequiresActualAmount);
    }

    let completed_at = completed.then(|| to_utc(now));
    let rows_affected = connection.execute(
        "UPDATE expense SET completed_at = ?1 WHERE id = ?2",
        (completed_at, id),
    )?;
    ensure_updated(rows_affected)?;

    Ok(Expense {
        completed_at,
        ..expense
    })
}

/// Delete the expense with `id`.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    delete_row("expense", id, connection)
}

// Timestamps are stored as text, so they must share an offset to compare correctly.
fn to_utc(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp
        .checked_to_offset(UtcOffset::UTC)
        .unwrap_or(timestamp)
}
