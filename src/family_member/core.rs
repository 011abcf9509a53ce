use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    input::optional_id,
    search::Searchable,
    validation::{MIN_NAME_LENGTH, required_choice, required_text},
};

pub type FamilyMemberId = DatabaseId;

/// The role of a family member within the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Designation {
    Sister,
    Dad,
    Mom,
    Brother,
}

impl Designation {
    /// Every designation, in the order they are offered to the user.
    pub const ALL: [Designation; 4] = [
        Designation::Sister,
        Designation::Dad,
        Designation::Mom,
        Designation::Brother,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Sister => "sister",
            Designation::Dad => "dad",
            Designation::Mom => "mom",
            Designation::Brother => "brother",
        }
    }
}

impl Display for Designation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Designation {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Designation::ALL
            .into_iter()
            .find(|designation| designation.as_str().eq_ignore_ascii_case(text.trim()))
            .ok_or_else(|| Error::InvalidField {
                field: "designation",
                reason: format!("\"{text}\" is not a known designation"),
            })
    }
}

impl ToSql for Designation {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Designation {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A member of the family that income and saving goals are recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: FamilyMemberId,
    pub name: String,
    pub designation: Designation,
}

impl Searchable for FamilyMember {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.designation.as_str()]
    }
}

/// A validated family member that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFamilyMember {
    pub name: String,
    pub designation: Designation,
}

/// The JSON body for creating or updating a family member.
///
/// `id` is only read for updates.
#[derive(Debug, Default, Deserialize)]
pub struct FamilyMemberPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<FamilyMemberId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
}

impl FamilyMemberPayload {
    /// Check the payload and convert it into a [NewFamilyMember].
    ///
    /// # Errors
    /// Returns an error if the name is shorter than two characters or the
    /// designation is missing or unknown.
    pub fn validate(self) -> Result<NewFamilyMember, Error> {
        let allowed = Designation::ALL.map(|designation| designation.as_str());

        Ok(NewFamilyMember {
            name: required_text(self.name, "name", MIN_NAME_LENGTH)?,
            designation: required_choice(self.designation, "designation", &allowed, |text| {
                text.parse().ok()
            })?,
        })
    }
}

pub fn create_family_member_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS family_member (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            designation TEXT NOT NULL CHECK (designation IN ('sister', 'dad', 'mom', 'brother'))
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_family_member(row: &Row) -> Result<FamilyMember, rusqlite::Error> {
    Ok(FamilyMember {
        id: row.get(0)?,
        name: row.get(1)?,
        designation: row.get(2)?,
    })
}

#[cfg(test)]
mod designation_tests {
    use crate::Error;

    use super::Designation;

    #[test]
    fn parses_known_designations() {
        assert_eq!("mom".parse::<Designation>(), Ok(Designation::Mom));
        assert_eq!(" Brother ".parse::<Designation>(), Ok(Designation::Brother));
    }

    #[test]
    fn rejects_unknown_designation() {
        let result = "cousin".parse::<Designation>();

        assert!(matches!(
            result,
            Err(Error::InvalidField {
                field: "designation",
                ..
            })
        ));
    }

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&Designation::Sister).unwrap(),
            "\"sister\""
        );
    }
}
