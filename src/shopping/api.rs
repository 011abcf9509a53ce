//! The JSON API for the shopping list.

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
    shopping::{
        core::{ShoppingItem, ShoppingItemPayload},
        db::{create_shopping_item, delete_shopping_item, list_shopping_items, update_shopping_item},
    },
};

/// The state needed by the shopping list endpoints and page.
#[derive(Debug, Clone)]
pub struct ShoppingState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Nairobi".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ShoppingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the shopping items, optionally only
/// those for the month given by the `month` query parameter.
pub async fn list_shopping_items_endpoint(
    State(state): State<ShoppingState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<ShoppingItem>>, Error> {
    let month = query.month()?;
    let connection = lock_connection(&state.db_connection)?;

    list_shopping_items(month, &connection)
        .inspect_err(|error| tracing::error!("could not list shopping items: {error}"))
        .map(Json)
}

/// A route handler for adding an item to the shopping list, responds with the new item.
pub async fn create_shopping_item_endpoint(
    State(state): State<ShoppingState>,
    ApiJson(payload): ApiJson<ShoppingItemPayload>,
) -> Result<(StatusCode, Json<ShoppingItem>), Error> {
    let item = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let item = create_shopping_item(&item, &connection)?;
    tracing::info!("created shopping item {}", item.id);

    Ok((StatusCode::CREATED, Json(item)))
}

/// A route handler for replacing the shopping item named by `id` in the body.
pub async fn update_shopping_item_endpoint(
    State(state): State<ShoppingState>,
    ApiJson(payload): ApiJson<ShoppingItemPayload>,
) -> Result<Json<Message>, Error> {
    let id = payload.id.ok_or(Error::MissingId)?;
    let item = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_shopping_item(id, &item, &connection)?;

    Ok(Message::new("Shopping item updated successfully"))
}

/// A route handler for deleting the shopping item given by the `id` query parameter.
pub async fn delete_shopping_item_endpoint(
    State(state): State<ShoppingState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    let id = query.id()?;
    let connection = lock_connection(&state.db_connection)?;

    delete_shopping_item(id, &connection)?;

    Ok(Message::new("Shopping item deleted successfully"))
}
