//! Household Ledger is a web app for tracking a family's finances: income,
//! expenses, shopping lists, savings goals and the family members they belong to.
//!
//! This library provides a JSON REST API for each record type and a set of
//! server-rendered pages that list, search and summarise those records.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod api;
mod app_state;
mod category;
mod dashboard;
mod database_id;
mod dates;
mod db;
mod endpoints;
mod error_pages;
mod expense;
mod family_member;
mod forms;
mod html;
mod income;
mod input;
mod logging;
mod navigation;
mod routing;
mod saving_goal;
mod search;
mod shopping;
mod summary;
mod timezone;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_timezone;

use crate::error_pages::ErrorPage;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every handler returns this one type. The HTTP status code and the body
/// sent to the client are decided in [Error::into_response] for the JSON API
/// and [Error::into_page_response] for HTML pages.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or empty in the request.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field was present but its value is not acceptable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the offending field as it appears in the request.
        field: &'static str,
        /// A human readable explanation of what is wrong with the value.
        reason: String,
    },

    /// The `id` of the record to update or delete was not given.
    #[error("ID is required")]
    MissingId,

    /// The month filter could not be parsed.
    #[error("invalid month \"{0}\", expected the format YYYY-MM")]
    InvalidMonth(String),

    /// The request body or query string could not be parsed at all.
    #[error("could not parse the request: {0}")]
    InvalidRequest(String),

    /// Tried to mark an expense as completed before its actual amount was recorded.
    #[error("an expense needs an actual amount before it can be marked as completed")]
    CompletionRequiresActualAmount,

    /// A foreign key (e.g., a category or family member ID) did not match an
    /// existing record.
    #[error("the record refers to a category or family member that does not exist")]
    InvalidReference,

    /// Tried to delete a record that other records still refer to.
    #[error("the record is still referred to by other records")]
    StillReferenced,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows or an
    /// update touched no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured timezone is not a valid, canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidReference
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

/// The JSON body sent to API clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidField { .. }
            | Error::MissingId
            | Error::InvalidMonth(_)
            | Error::InvalidRequest(_)
            | Error::CompletionRequiresActualAmount
            | Error::InvalidReference => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::StillReferenced => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezone(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Error::MissingField(_)
            | Error::InvalidField { .. }
            | Error::MissingId
            | Error::InvalidMonth(_)
            | Error::InvalidRequest(_)
            | Error::CompletionRequiresActualAmount => "VALIDATION_ERROR",
            Error::InvalidReference => "INVALID_REFERENCE",
            Error::StillReferenced => "STILL_REFERENCED",
            Error::NotFound => "NOT_FOUND",
            Error::SqlError(_) | Error::DatabaseLockError => "PERSISTENCE_ERROR",
            Error::InvalidTimezone(_) => "CONFIGURATION_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::MissingField(field) | Error::InvalidField { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            Error::MissingId => Some(serde_json::json!({ "field": "id" })),
            Error::InvalidMonth(_) => Some(serde_json::json!({ "field": "month" })),
            Error::CompletionRequiresActualAmount => {
                Some(serde_json::json!({ "field": "actual_amount" }))
            }
            _ => None,
        }
    }

    /// Render the error as an HTML page for the server-rendered views.
    pub(crate) fn into_page_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::not_found().into_response(),
            Error::InvalidMonth(month) => ErrorPage::invalid_month(&month).into_response(),
            Error::InvalidTimezone(timezone) => {
                ErrorPage::invalid_timezone(&timezone).into_response()
            }
            error @ (Error::MissingField(_)
            | Error::InvalidField { .. }
            | Error::MissingId
            | Error::InvalidRequest(_)) => ErrorPage::bad_request(&error.to_string()).into_response(),
            error => {
                tracing::error!("An unexpected error occurred while rendering a page: {error}");
                ErrorPage::internal_error().into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged in full but never described to the client.
        let message = if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {self}");
            "Something went wrong, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            code: self.code(),
            message,
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}
