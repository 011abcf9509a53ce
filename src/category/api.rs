//! The JSON API for expense and shopping categories.
//!
//! Both kinds of category share one implementation, the public handlers only
//! pick the [CategoryKind].

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
    category::{
        core::{Category, CategoryKind, CategoryPayload},
        db::{create_category, delete_category, list_categories, update_category},
    },
    db::lock_connection,
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn list(kind: CategoryKind, state: &CategoryState) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_categories(kind, &connection)
        .inspect_err(|error| tracing::error!("could not list {}: {error}", kind.table()))
        .map(Json)
}

fn create(
    kind: CategoryKind,
    state: &CategoryState,
    payload: CategoryPayload,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(kind, &name, &connection)?;
    tracing::info!("created {} {}", kind.table(), category.id);

    Ok((StatusCode::CREATED, Json(category)))
}

fn update(
    kind: CategoryKind,
    state: &CategoryState,
    payload: CategoryPayload,
) -> Result<Json<Message>, Error> {
    let id = payload.id.ok_or(Error::MissingId)?;
    let name = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_category(kind, id, &name, &connection)?;

    Ok(Message::new(&format!("{} updated successfully", kind.label())))
}

fn delete(kind: CategoryKind, state: &CategoryState, query: IdQuery) -> Result<Json<Message>, Error> {
    let id = query.id()?;
    let connection = lock_connection(&state.db_connection)?;

    delete_category(kind, id, &connection)?;

    Ok(Message::new(&format!("{} deleted successfully", kind.label())))
}

/// A route handler that responds with every expense category.
pub async fn list_expense_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    list(CategoryKind::Expense, &state)
}

/// A route handler for adding an expense category.
pub async fn create_expense_category_endpoint(
    State(state): State<CategoryState>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), Error> {
    create(CategoryKind::Expense, &state, payload)
}

/// A route handler for renaming an expense category.
pub async fn update_expense_category_endpoint(
    State(state): State<CategoryState>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> Result<Json<Message>, Error> {
    update(CategoryKind::Expense, &state, payload)
}

/// A route handler for deleting an expense category.
pub async fn delete_expense_category_endpoint(
    State(state): State<CategoryState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    delete(CategoryKind::Expense, &state, query)
}

/// A route handler that responds with every shopping category.
pub async fn list_shopping_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    list(CategoryKind::Shopping, &state)
}

/// A route handler for adding a shopping category.
pub async fn create_shopping_category_endpoint(
    State(state): State<CategoryState>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), Error> {
    create(CategoryKind::Shopping, &state, payload)
}

/// A route handler for renaming a shopping category.
pub async fn update_shopping_category_endpoint(
    State(state): State<CategoryState>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> Result<Json<Message>, Error> {
    update(CategoryKind::Shopping, &state, payload)
}

/// A route handler for deleting a shopping category.
pub async fn delete_shopping_category_endpoint(
    State(state): State<CategoryState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    delete(CategoryKind::Shopping, &state, query)
}
