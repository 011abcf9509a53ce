//! Extractors and response bodies shared by the JSON API handlers.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, dates::Month};

/// A JSON request body whose parse failures are reported as [Error::InvalidRequest].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub(crate) struct ApiJson<T>(pub T);

/// A query string whose parse failures are reported as [Error::InvalidRequest].
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(Error))]
pub(crate) struct ApiQuery<T>(pub T);

/// A path parameter whose parse failures are reported as [Error::InvalidRequest].
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(Error))]
pub(crate) struct ApiPath<T>(pub T);

/// The query string for DELETE requests, e.g. `?id=3`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdQuery {
    id: Option<String>,
}

impl IdQuery {
    /// Parse the `id` parameter.
    ///
    /// # Errors
    /// Returns [Error::MissingId] if `id` is absent or blank, or
    /// [Error::InvalidField] if it is not an integer.
    pub(crate) fn id(&self) -> Result<DatabaseId, Error> {
        let text = self.id.as_deref().map(str::trim).unwrap_or_default();

        if text.is_empty() {
            return Err(Error::MissingId);
        }

        text.parse().map_err(|_| Error::InvalidField {
            field: "id",
            reason: format!("\"{text}\" is not a valid ID"),
        })
    }
}

/// The query string for list requests that can be scoped to a month, e.g. `?month=2024-05`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MonthQuery {
    month: Option<String>,
}

impl MonthQuery {
    /// Parse the optional `month` parameter.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is given but is not a valid month.
    pub(crate) fn month(&self) -> Result<Option<Month>, Error> {
        Month::parse_optional(self.month.as_deref())
    }
}

/// The body of a successful update or delete response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Message {
    pub message: String,
}

impl Message {
    pub(crate) fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_owned(),
        })
    }
}
