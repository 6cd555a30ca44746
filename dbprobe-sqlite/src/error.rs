//! Error types for SQLite probes.

use dbprobe_core::{DriverError, DriverId};
use thiserror::Error;

/// Result type for SQLite probes.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// Errors that can occur while probing SQLite.
#[derive(Error, Debug)]
pub enum SqliteError {
    /// Error from the background connection thread.
    #[error("sqlite error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    /// SQLite library error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl SqliteError {
    fn rusqlite(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Connection(tokio_rusqlite::Error::Rusqlite(e)) => Some(e),
            Self::Connection(tokio_rusqlite::Error::Close((_, e))) => Some(e),
            Self::Connection(_) => None,
        }
    }

    /// Extended SQLite result code, if the error carries one.
    pub fn extended_code(&self) -> Option<i32> {
        match self.rusqlite()? {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.extended_code),
            _ => None,
        }
    }
}

impl From<SqliteError> for DriverError {
    fn from(err: SqliteError) -> Self {
        let message = match err.rusqlite() {
            Some(e) => e.to_string(),
            None => err.to_string(),
        };
        let driver = DriverError::new(DriverId::Sqlite, message);
        match err.extended_code() {
            Some(code) => driver.with_code(code.to_string()),
            None => driver,
        }
    }
}
