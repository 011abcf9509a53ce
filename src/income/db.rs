//! Database operations for income.

use rusqlite::Connection;

use crate::{
    Error,
    dates::Month,
    db::{delete_row, ensure_updated},
    income::core::{Income, IncomeId, NewIncome, map_row_to_income},
};

const SELECT_INCOME: &str = "SELECT
        income.id,
        income.family_member_id,
        family_member.name,
        family_member.designation,
        income.source,
        income.amount,
        income.month
    FROM income
    INNER JOIN family_member ON family_member.id = income.family_member_id";

/// Retrieve income most recent month first, optionally only that earned in `month`.
pub fn list_income(month: Option<Month>, connection: &Connection) -> Result<Vec<Income>, Error> {
    let (start, end) = match month.map(Month::date_range) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    connection
        .prepare(&format!(
            "{SELECT_INCOME}
            WHERE (?1 IS NULL OR income.month >= ?1)
                AND (?2 IS NULL OR income.month < ?2)
            ORDER BY income.month DESC, income.id ASC;"
        ))?
        .query_map((start, end), map_row_to_income)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Retrieve a single income entry by ID.
pub fn get_income(id: IncomeId, connection: &Connection) -> Result<Income, Error> {
    connection
        .prepare(&format!("{SELECT_INCOME} WHERE income.id = :id;"))?
        .query_row(&[(":id", &id)], map_row_to_income)
        .map_err(Error::from)
}

/// Create an income entry and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidReference] if the family member does not exist.
pub fn create_income(income: &NewIncome, connection: &Connection) -> Result<Income, Error> {
    connection.execute(
        "INSERT INTO income (family_member_id, source, amount, month) VALUES (?1, ?2, ?3, ?4);",
        (
            income.family_member_id,
            &income.source,
            income.amount,
            income.month.first_day(),
        ),
    )?;

    get_income(connection.last_insert_rowid(), connection)
}

/// Overwrite the income entry with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no income entry with `id` or
/// [Error::InvalidReference] if the family member does not exist.
pub fn update_income(id: IncomeId, income: &NewIncome, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE income SET family_member_id = ?1, source = ?2, amount = ?3, month = ?4 WHERE id = ?5",
        (
            income.family_member_id,
            &income.source,
            income.amount,
            income.month.first_day(),
            id,
        ),
    )?;

    ensure_updated(rows_affected)
}

/// Delete the income entry with `id`.
pub fn delete_income(id: IncomeId, connection: &Connection) -> Result<(), Error> {
    delete_row("income", id, connection)
}
