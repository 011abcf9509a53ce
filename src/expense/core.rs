use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    category::CategoryId,
    database_id::DatabaseId,
    dates::parse_timestamp,
    input::{optional_id, optional_number},
    search::Searchable,
    validation::{MIN_NAME_LENGTH, at_least, required, required_id, required_text},
};

pub type ExpenseId = DatabaseId;

/// A planned or paid household expense.
///
/// An expense is completed once `completed_at` is set, which requires the
/// actual amount paid to be known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub name: String,
    pub estimated_amount: f64,
    pub actual_amount: Option<f64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    /// When the expense was recorded, this decides which month it belongs to.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Expense {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl Searchable for Expense {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category_name.as_str()]
    }
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category_id: CategoryId,
    pub name: String,
    pub estimated_amount: f64,
    pub actual_amount: Option<f64>,
    pub completed_at: Option<OffsetDateTime>,
}

/// The JSON body for creating or updating an expense.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensePayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<ExpenseId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub estimated_amount: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub actual_amount: Option<f64>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl ExpensePayload {
    /// Check the payload and convert it into a [NewExpense].
    ///
    /// # Errors
    /// Returns an error if a required field is missing, an amount is
    /// negative, or `completed_at` is set without an actual amount.
    pub fn validate(self) -> Result<NewExpense, Error> {
        let category_id = required_id(self.category_id, "category_id")?;
        let name = required_text(self.name, "name", MIN_NAME_LENGTH)?;
        let estimated_amount = at_least(
            required(self.estimated_amount, "estimated_amount")?,
            0.0,
            "estimated_amount",
        )?;
        let actual_amount = self
            .actual_amount
            .map(|amount| at_least(amount, 0.0, "actual_amount"))
            .transpose()?;
        let completed_at = self
            .completed_at
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| parse_timestamp(text, "completed_at"))
            .transpose()?;

        if completed_at.is_some() && actual_amount.is_none() {
            return Err(Error::CompletionRequiresActualAmount);
        }

        Ok(NewExpense {
            category_id,
            name,
            estimated_amount,
            actual_amount,
            completed_at,
        })
    }
}

/// The JSON body for marking an expense as completed or not completed.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleCompletionPayload {
    #[serde(default)]
    pub completed: Option<bool>,
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL REFERENCES expense_category(id) ON DELETE RESTRICT,
            name TEXT NOT NULL,
            estimated_amount REAL NOT NULL,
            actual_amount REAL,
            completed_at TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_created_at ON expense(created_at);",
    )?;

    Ok(())
}

/// Map a row of `id, category_id, category_name, name, estimated_amount,
/// actual_amount, completed_at, created_at` to an [Expense].
pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        category_id: row.get(1)?,
        category_name: row.get(2)?,
        name: row.get(3)?,
        estimated_amount: row.get(4)?,
        actual_amount: row.get(5)?,
        completed_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod payload_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{ExpensePayload, NewExpense};

    fn payload() -> ExpensePayload {
        ExpensePayload {
            id: None,
            category_id: Some(1),
            name: Some("Electricity".to_owned()),
            estimated_amount: Some(2500.0),
            actual_amount: None,
            completed_at: None,
        }
    }

    #[test]
    fn valid_payload() {
        assert_eq!(
            payload().validate(),
            Ok(NewExpense {
                category_id: 1,
                name: "Electricity".to_owned(),
                estimated_amount: 2500.0,
                actual_amount: None,
                completed_at: None,
            })
        );
    }

    #[test]
    fn missing_category() {
        let payload = ExpensePayload {
            category_id: None,
            ..payload()
        };

        assert_eq!(payload.validate(), Err(Error::MissingField("category_id")));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let estimated = ExpensePayload {
            estimated_amount: Some(-1.0),
            ..payload()
        };
        let actual = ExpensePayload {
            actual_amount: Some(-0.5),
            ..payload()
        };

        assert!(matches!(
            estimated.validate(),
            Err(Error::InvalidField {
                field: "estimated_amount",
                ..
            })
        ));
        assert!(matches!(
            actual.validate(),
            Err(Error::InvalidField {
                field: "actual_amount",
                ..
            })
        ));
    }

    #[test]
    fn zero_estimate_is_allowed() {
        let payload = ExpensePayload {
            estimated_amount: Some(0.0),
            ..payload()
        };

        assert!(payload.validate().is_ok());
    }

    #[test]
    fn completion_requires_actual_amount() {
        let payload = ExpensePayload {
            completed_at: Some("2024-05-20T10:00:00Z".to_owned()),
            ..payload()
        };

        assert_eq!(payload.validate(), Err(Error::CompletionRequiresActualAmount));
    }

    #[test]
    fn completed_expense() {
        let payload = ExpensePayload {
            actual_amount: Some(2300.0),
            completed_at: Some("2024-05-20T13:00:00+03:00".to_owned()),
            ..payload()
        };

        let expense = payload.validate().unwrap();

        assert_eq!(expense.completed_at, Some(datetime!(2024-05-20 10:00 UTC)));
    }

    #[test]
    fn blank_completed_at_is_not_completed() {
        let payload = ExpensePayload {
            completed_at: Some("".to_owned()),
            ..payload()
        };

        assert_eq!(payload.validate().unwrap().completed_at, None);
    }
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use crate::category::create_category_tables;

    use super::create_expense_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_category_tables(&connection).expect("Could not create category tables");

        assert_eq!(Ok(()), create_expense_table(&connection));
    }
}
