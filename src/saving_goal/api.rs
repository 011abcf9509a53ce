//! The JSON API for saving goals.

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
    saving_goal::{
        core::{SavingGoal, SavingGoalPayload},
        db::{create_saving_goal, delete_saving_goal, list_saving_goals, update_saving_goal},
    },
};

/// The state needed by the saving goal endpoints and page.
#[derive(Debug, Clone)]
pub struct SavingGoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every saving goal.
pub async fn list_saving_goals_endpoint(
    State(state): State<SavingGoalState>,
) -> Result<Json<Vec<SavingGoal>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_saving_goals(&connection)
        .inspect_err(|error| tracing::error!("could not list saving goals: {error}"))
        .map(Json)
}

/// A route handler for adding a saving goal, responds with the new goal.
pub async fn create_saving_goal_endpoint(
    State(state): State<SavingGoalState>,
    ApiJson(payload): ApiJson<SavingGoalPayload>,
) -> Result<(StatusCode, Json<SavingGoal>), Error> {
    let goal = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let goal = create_saving_goal(&goal, &connection)?;
    tracing::info!("created saving goal {}", goal.id);

    Ok((StatusCode::CREATED, Json(goal)))
}

/// A route handler for replacing the saving goal named by `id` in the body.
pub async fn update_saving_goal_endpoint(
    State(state): State<SavingGoalState>,
    ApiJson(payload): ApiJson<SavingGoalPayload>,
) -> Result<Json<Message>, Error> {
    let id = payload.id.ok_or(Error::MissingId)?;
    let goal = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_saving_goal(id, &goal, &connection)?;

    Ok(Message::new("Saving goal updated successfully"))
}

/// A route handler for deleting the saving goal given by the `id` query parameter.
pub async fn delete_saving_goal_endpoint(
    State(state): State<SavingGoalState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    let id = query.id()?;
    let connection = lock_connection(&state.db_connection)?;

    delete_saving_goal(id, &connection)?;

    Ok(Message::new("Saving goal deleted successfully"))
}
