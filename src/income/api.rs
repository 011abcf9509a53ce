//! The JSON API for income.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    api::{ApiJson, ApiQuery, IdQuery, Message, MonthQuery},
    db::lock_connection,
    income::{
        core::{Income, IncomePayload},
        db::{create_income, delete_income, list_income, update_income},
    },
};

/// The state needed by the income endpoints and page.
#[derive(Debug, Clone)]
pub struct IncomeState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Nairobi".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the income entries, optionally only
/// those for the month given by the `month` query parameter.
pub async fn list_income_endpoint(
    State(state): State<IncomeState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<Income>>, Error> {
    let month = query.month()?;
    let connection = lock_connection(&state.db_connection)?;

    list_income(month, &connection)
        .inspect_err(|error| tracing::error!("could not list income: {error}"))
        .map(Json)
}

/// A route handler for recording income, responds with the new income entry.
pub async fn create_income_endpoint(
    State(state): State<IncomeState>,
    ApiJson(payload): ApiJson<IncomePayload>,
) -> Result<(StatusCode, Json<Income>), Error> {
    let income = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let income = create_income(&income, &connection)?;
    tracing::info!("created income {}", income.id);

    Ok((StatusCode::CREATED, Json(income)))
}

/// A route handler for replacing the income entry named by `id` in the body.
pub async fn update_income_endpoint(
    State(state): State<IncomeState>,
    ApiJson(payload): ApiJson<IncomePayload>,
) -> Result<Json<Message>, Error> {
    let id = payload.id.ok_or(Error::MissingId)?;
    let income = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_income(id, &income, &connection)?;

    Ok(Message::new("Income updated successfully"))
}

/// A route handler for deleting the income entry given by the `id` query parameter.
pub async fn delete_income_endpoint(
    State(state): State<IncomeState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    let id = query.id()?;
    let connection = lock_connection(&state.db_connection)?;

    delete_income(id, &connection)?;

    Ok(Message::new("Income deleted successfully"))
}
