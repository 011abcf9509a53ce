//! The JSON API for family members.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    api::{ApiJson, ApiQuery, IdQuery, Message},
    db::lock_connection,
    family_member::{
        core::{FamilyMember, FamilyMemberPayload},
        db::{create_family_member, delete_family_member, list_family_members, update_family_member},
    },
};

/// The state needed by the family member endpoints.
#[derive(Debug, Clone)]
pub struct FamilyMemberState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FamilyMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every family member.
pub async fn list_family_members_endpoint(
    State(state): State<FamilyMemberState>,
) -> Result<Json<Vec<FamilyMember>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_family_members(&connection)
        .inspect_err(|error| tracing::error!("could not list family members: {error}"))
        .map(Json)
}

/// A route handler for adding a family member, responds with the new member.
pub async fn create_family_member_endpoint(
    State(state): State<FamilyMemberState>,
    ApiJson(payload): ApiJson<FamilyMemberPayload>,
) -> Result<(StatusCode, Json<FamilyMember>), Error> {
    let member = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let member = create_family_member(&member, &connection)?;
    tracing::info!("created family member {}", member.id);

    Ok((StatusCode::CREATED, Json(member)))
}

/// A route handler for replacing the details of the family member named by `id` in the body.
pub async fn update_family_member_endpoint(
    State(state): State<FamilyMemberState>,
    ApiJson(payload): ApiJson<FamilyMemberPayload>,
) -> Result<Json<Message>, Error> {
    let id = payload.id.ok_or(Error::MissingId)?;
    let member = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_family_member(id, &member, &connection)?;

    Ok(Message::new("Family member updated successfully"))
}

/// A route handler for deleting the family member given by the `id` query parameter.
pub async fn delete_family_member_endpoint(
    State(state): State<FamilyMemberState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    let id = query.id()?;
    let connection = lock_connection(&state.db_connection)?;

    delete_family_member(id, &connection)?;

    Ok(Message::new("Family member deleted successfully"))
}
