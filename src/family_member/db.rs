//! Database operations for family members.

use rusqlite::Connection;

use crate::{
    Error,
    db::{delete_row, ensure_updated},
    family_member::core::{FamilyMember, FamilyMemberId, NewFamilyMember, map_row_to_family_member},
};

/// Retrieve all family members in the order they were added.
pub fn list_family_members(connection: &Connection) -> Result<Vec<FamilyMember>, Error> {
    connection
        .prepare("SELECT id, name, designation FROM family_member ORDER BY id ASC;")?
        .query_map([], map_row_to_family_member)?
        .map(|maybe_member| maybe_member.map_err(Error::from))
        .collect()
}

/// Retrieve a single family member by ID.
pub fn get_family_member(id: FamilyMemberId, connection: &Connection) -> Result<FamilyMember, Error> {
    connection
        .prepare("SELECT id, name, designation FROM family_member WHERE id = :id;")?
        .query_row(&[(":id", &id)], map_row_to_family_member)
        .map_err(Error::from)
}

/// Create a family member and return it with its generated ID.
pub fn create_family_member(
    member: &NewFamilyMember,
    connection: &Connection,
) -> Result<FamilyMember, Error> {
    connection.execute(
        "INSERT INTO family_member (name, designation) VALUES (?1, ?2);",
        (&member.name, member.designation),
    )?;

    get_family_member(connection.last_insert_rowid(), connection)
}

/// Overwrite the family member with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no family member with `id`.
pub fn update_family_member(
    id: FamilyMemberId,
    member: &NewFamilyMember,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE family_member SET name = ?1, designation = ?2 WHERE id = ?3",
        (&member.name, member.designation, id),
    )?;

    ensure_updated(rows_affected)
}

/// Delete the family member with `id`.
///
/// # Errors
/// Returns [Error::StillReferenced] if income or saving goals are still
/// recorded against the family member.
pub fn delete_family_member(id: FamilyMemberId, connection: &Connection) -> Result<(), Error> {
    delete_row("family_member", id, connection)
}
