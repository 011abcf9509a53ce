//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time_tz::Tz;

use crate::{Error, db::initialize, timezone::get_timezone};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Nairobi".
    ///
    /// Used to work out the current month and which month an expense was
    /// recorded in.
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Africa/Nairobi".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or if
    /// `local_timezone` is not a known timezone.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        if get_timezone(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

/// Look up the timezone named by `local_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if `local_timezone` is not a canonical timezone name.
pub(crate) fn local_timezone(local_timezone: &str) -> Result<&'static Tz, Error> {
    get_timezone(local_timezone).ok_or_else(|| Error::InvalidTimezone(local_timezone.to_owned()))
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{AppState, Error};

    #[test]
    fn new_initializes_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "Etc/UTC").expect("could not create app state");

        let connection = state.db_connection.lock().unwrap();
        let table_count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'income'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 1);
    }

    #[test]
    fn new_rejects_unknown_timezone() {
        let connection = Connection::open_in_memory().unwrap();

        let result = AppState::new(connection, "Middle/Earth");

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezone("Middle/Earth".to_owned()))
        );
    }
}
