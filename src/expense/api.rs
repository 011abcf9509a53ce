//! The JSON API for expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    api::{ApiJson, ApiPath, ApiQuery, IdQuery, Message, MonthQuery},
    app_state::local_timezone,
    db::lock_connection,
    expense::{
        core::{Expense, ExpenseId, ExpensePayload, ToggleCompletionPayload},
        db::{create_expense, delete_expense, list_expenses, set_completion, update_expense},
    },
};

/// The state needed by the expense endpoints and page.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Nairobi".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the expenses, optionally only those
/// recorded in the month given by the `month` query parameter.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    let month = query.month()?;
    let timezone = local_timezone(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    list_expenses(month, timezone, &connection)
        .inspect_err(|error| tracing::error!("could not list expenses: {error}"))
        .map(Json)
}

/// A route handler for recording a new expense, responds with the new expense.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    ApiJson(payload): ApiJson<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let expense = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let expense = create_expense(&expense, OffsetDateTime::now_utc(), &connection)?;
    tracing::info!("created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}

/// A route handler for replacing the details of the expense named by `id` in the body.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    ApiJson(payload): ApiJson<ExpensePayload>,
) -> Result<Json<Message>, Error> {
    let id = payload.id.ok_or(Error::MissingId)?;
    let expense = payload.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_expense(id, &expense, &connection)?;

    Ok(Message::new("Expense updated successfully"))
}

/// A route handler for deleting the expense given by the `id` query parameter.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Message>, Error> {
    let id = query.id()?;
    let connection = lock_connection(&state.db_connection)?;

    delete_expense(id, &connection)?;

    Ok(Message::new("Expense deleted successfully"))
}

/// A route handler for marking an expense as completed (now) or not completed,
/// responds with the updated expense.
pub async fn toggle_expense_completion_endpoint(
    State(state): State<ExpenseState>,
    ApiPath(expense_id): ApiPath<ExpenseId>,
    ApiJson(payload): ApiJson<ToggleCompletionPayload>,
) -> Result<Json<Expense>, Error> {
    let completed = payload.completed.ok_or(Error::MissingField("completed"))?;
    let connection = lock_connection(&state.db_connection)?;

    let expense = set_completion(expense_id, completed, OffsetDateTime::now_utc(), &connection)?;
    tracing::info!("set completion of expense {expense_id} to {completed}");

    Ok(Json(expense))
}
