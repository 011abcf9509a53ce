use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    dates::{iso_date, parse_date},
    family_member::{Designation, FamilyMemberId},
    input::{optional_id, optional_number},
    search::Searchable,
    validation::{
        MIN_NAME_LENGTH, at_least, optional_text, required, required_choice, required_id,
        required_text,
    },
};

pub type SavingGoalId = DatabaseId;

/// How the money for a saving goal is put aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    FixedDeposit,
    Recurring,
    Flexible,
    Challenge,
    TargetedSavings,
}

impl GoalType {
    pub const ALL: [GoalType; 5] = [
        GoalType::FixedDeposit,
        GoalType::Recurring,
        GoalType::Flexible,
        GoalType::Challenge,
        GoalType::TargetedSavings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::FixedDeposit => "fixed_deposit",
            GoalType::Recurring => "recurring",
            GoalType::Flexible => "flexible",
            GoalType::Challenge => "challenge",
            GoalType::TargetedSavings => "targeted_savings",
        }
    }

    /// The name shown on the page, e.g. "Fixed Deposit".
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::FixedDeposit => "Fixed Deposit",
            GoalType::Recurring => "Recurring",
            GoalType::Flexible => "Flexible",
            GoalType::Challenge => "Challenge",
            GoalType::TargetedSavings => "Targeted Savings",
        }
    }
}

/// Where a saving goal is up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Hold,
    Other,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 4] = [
        GoalStatus::Active,
        GoalStatus::Completed,
        GoalStatus::Hold,
        GoalStatus::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Hold => "hold",
            GoalStatus::Other => "other",
        }
    }
}

macro_rules! impl_text_enum {
    ($name:ident, $field:literal, $description:literal) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .into_iter()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(text.trim()))
                    .ok_or_else(|| Error::InvalidField {
                        field: $field,
                        reason: format!("\"{text}\" is not a known {}", $description),
                    })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
            }
        }
    };
}

impl_text_enum!(GoalType, "goal_type", "goal type");
impl_text_enum!(GoalStatus, "status", "goal status");

/// An amount a family member is saving towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingGoal {
    pub id: SavingGoalId,
    pub family_member_id: FamilyMemberId,
    pub family_member_name: String,
    pub family_member_designation: Designation,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    pub target_amount: f64,
    pub goal_type: GoalType,
    pub status: GoalStatus,
}

impl Searchable for SavingGoal {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.family_member_name.as_str(),
            self.name.as_str(),
            self.goal_type.as_str(),
            self.goal_type.label(),
        ]
    }
}

/// A validated saving goal that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavingGoal {
    pub family_member_id: FamilyMemberId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub target_amount: f64,
    pub goal_type: GoalType,
    pub status: GoalStatus,
}

/// The JSON body for creating or updating a saving goal.
#[derive(Debug, Default, Deserialize)]
pub struct SavingGoalPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<SavingGoalId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub family_member_id: Option<FamilyMemberId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SavingGoalPayload {
    /// Check the payload and convert it into a [NewSavingGoal].
    ///
    /// A missing status means the goal is [GoalStatus::Active].
    ///
    /// # Errors
    /// Returns an error if a required field is missing, a date is invalid,
    /// the goal ends before it starts, the target is negative, or the goal
    /// type or status is unknown.
    pub fn validate(self) -> Result<NewSavingGoal, Error> {
        let family_member_id = required_id(self.family_member_id, "family_member_id")?;
        let name = required_text(self.name, "name", MIN_NAME_LENGTH)?;
        let start_date = optional_text(self.start_date)
            .ok_or(Error::MissingField("start_date"))
            .and_then(|text| parse_date(&text, "start_date"))?;
        let end_date = optional_text(self.end_date)
            .map(|text| parse_date(&text, "end_date"))
            .transpose()?;

        if end_date.is_some_and(|end_date| end_date < start_date) {
            return Err(Error::InvalidField {
                field: "end_date",
                reason: "must not be before the start date".to_owned(),
            });
        }

        let target_amount = at_least(
            required(self.target_amount, "target_amount")?,
            0.0,
            "target_amount",
        )?;
        let goal_types = GoalType::ALL.map(|goal_type| goal_type.as_str());
        let goal_type = required_choice(self.goal_type, "goal_type", &goal_types, |text| {
            text.parse().ok()
        })?;
        let status = match optional_text(self.status) {
            None => GoalStatus::Active,
            Some(text) => text.parse()?,
        };

        Ok(NewSavingGoal {
            family_member_id,
            name,
            description: optional_text(self.description),
            start_date,
            end_date,
            target_amount,
            goal_type,
            status,
        })
    }
}

pub fn create_saving_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS saving_goal (
            id INTEGER PRIMARY KEY,
            family_member_id INTEGER NOT NULL REFERENCES family_member(id) ON DELETE RESTRICT,
            name TEXT NOT NULL,
            description TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT,
            target_amount REAL NOT NULL,
            goal_type TEXT NOT NULL CHECK (goal_type IN
                ('fixed_deposit', 'recurring', 'flexible', 'challenge', 'targeted_savings')),
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN
                ('active', 'completed', 'hold', 'other'))
        )",
        (),
    )?;

    Ok(())
}

/// Map a row of `id, family_member_id, family_member_name,
/// family_member_designation, name, description, start_date, end_date,
/// target_amount, goal_type, status` to a [SavingGoal].
pub fn map_row_to_saving_goal(row: &Row) -> Result<SavingGoal, rusqlite::Error> {
    Ok(SavingGoal {
        id: row.get(0)?,
        family_member_id: row.get(1)?,
        family_member_name: row.get(2)?,
        family_member_designation: row.get(3)?,
        name: row.get(4)?,
        description: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
        target_amount: row.get(8)?,
        goal_type: row.get(9)?,
        status: row.get(10)?,
    })
}


#[cfg(test)]
mod payload_tests {
    use time::macros::date;

    use crate::Error;

    use super::{GoalStatus, GoalType, NewSavingGoal, SavingGoalPayload};

    fn payload() -> SavingGoalPayload {
        SavingGoalPayload {
            id: None,
            family_member_id: Some(1),
            name: Some("School fees".to_owned()),
            description: Some(String::new()),
            start_date: Some("2024-01-15".to_owned()),
            end_date: Some("2024-12-31".to_owned()),
            target_amount: Some(120_000.0),
            goal_type: Some("recurring".to_owned()),
            status: None,
        }
    }

    #[test]
    fn valid_payload_defaults_to_active() {
        assert_eq!(
            payload().validate(),
            Ok(NewSavingGoal {
                family_member_id: 1,
                name: "School fees".to_owned(),
                description: None,
                start_date: date!(2024 - 01 - 15),
                end_date: Some(date!(2024 - 12 - 31)),
                target_amount: 120_000.0,
                goal_type: GoalType::Recurring,
                status: GoalStatus::Active,
            })
        );
    }

    #[test]
    fn end_date_is_optional() {
        let payload = SavingGoalPayload {
            end_date: Some(String::new()),
            ..payload()
        };

        assert_eq!(payload.validate().map(|goal| goal.end_date), Ok(None));
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let payload = SavingGoalPayload {
            end_date: Some("2023-12-31".to_owned()),
            ..payload()
        };

        assert!(matches!(
            payload.validate(),
            Err(Error::InvalidField {
                field: "end_date",
                ..
            })
        ));
    }

    #[test]
    fn start_date_is_required_and_must_be_valid() {
        let missing = SavingGoalPayload {
            start_date: None,
            ..payload()
        };
        let invalid = SavingGoalPayload {
            start_date: Some("15/01/2024".to_owned()),
            ..payload()
        };

        assert_eq!(missing.validate(), Err(Error::MissingField("start_date")));
        assert!(matches!(
            invalid.validate(),
            Err(Error::InvalidField {
                field: "start_date",
                ..
            })
        ));
    }

    #[test]
    fn unknown_goal_type_is_rejected() {
        let payload = SavingGoalPayload {
            goal_type: Some("lottery".to_owned()),
            ..payload()
        };

        assert!(matches!(
            payload.validate(),
            Err(Error::InvalidField {
                field: "goal_type",
                ..
            })
        ));
    }

    #[test]
    fn explicit_status_is_kept() {
        let payload = SavingGoalPayload {
            status: Some("completed".to_owned()),
            ..payload()
        };

        assert_eq!(
            payload.validate().map(|goal| goal.status),
            Ok(GoalStatus::Completed)
        );
    }

    #[test]
    fn negative_target_is_rejected() {
        let payload = SavingGoalPayload {
            target_amount: Some(-5.0),
            ..payload()
        };

        assert!(matches!(
            payload.validate(),
            Err(Error::InvalidField {
                field: "target_amount",
                ..
            })
        ));
    }
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use crate::family_member::create_family_member_table;

    use super::create_saving_goal_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_family_member_table(&connection).expect("Could not create family member table");

        assert_eq!(Ok(()), create_saving_goal_table(&connection));
    }
}
