use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    dates::{Month, iso_date},
    family_member::{Designation, FamilyMemberId},
    input::{optional_id, optional_number},
    search::Searchable,
    validation::{MIN_NAME_LENGTH, greater_than, required, required_id, required_text},
};

pub type IncomeId = DatabaseId;

/// Money a family member earned in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    pub family_member_id: FamilyMemberId,
    pub family_member_name: String,
    pub family_member_designation: Designation,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    pub amount: f64,
    /// The first day of the month the income was earned in.
    #[serde(with = "iso_date")]
    pub month: Date,
}

impl Searchable for Income {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.family_member_name.as_str(), self.source.as_str()]
    }
}

/// A validated income entry that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub family_member_id: FamilyMemberId,
    pub source: String,
    pub amount: f64,
    pub month: Month,
}

/// The JSON body for creating or updating an income entry.
///
/// `month` may be `YYYY-MM` or a full date, the day is dropped either way.
#[derive(Debug, Default, Deserialize)]
pub struct IncomePayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<IncomeId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub family_member_id: Option<FamilyMemberId>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub month: Option<String>,
}

impl IncomePayload {
    /// Check the payload and convert it into a [NewIncome].
    ///
    /// # Errors
    /// Returns an error if any field is missing, the source is shorter than
    /// two characters, the amount is not positive or the month is invalid.
    pub fn validate(self) -> Result<NewIncome, Error> {
        let family_member_id = required_id(self.family_member_id, "family_member_id")?;
        let source = required_text(self.source, "source", MIN_NAME_LENGTH)?;
        let amount = greater_than(required(self.amount, "amount")?, 0.0, "amount")?;
        let month = Month::parse_optional(self.month.as_deref())?
            .ok_or(Error::MissingField("month"))?;

        Ok(NewIncome {
            family_member_id,
            source,
            amount,
            month,
        })
    }
}

pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            family_member_id INTEGER NOT NULL REFERENCES family_member(id) ON DELETE RESTRICT,
            source TEXT NOT NULL,
            amount REAL NOT NULL,
            month TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_income_month ON income(month);",
    )?;

    Ok(())
}

/// Map a row of `id, family_member_id, family_member_name,
/// family_member_designation, source, amount, month` to an [Income].
pub fn map_row_to_income(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        family_member_id: row.get(1)?,
        family_member_name: row.get(2)?,
        family_member_designation: row.get(3)?,
        source: row.get(4)?,
        amount: row.get(5)?,
        month: row.get(6)?,
    })
}


#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use crate::family_member::create_family_member_table;

    use super::create_income_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_family_member_table(&connection).expect("Could not create family member table");

        assert_eq!(Ok(()), create_income_table(&connection));
    }
}
