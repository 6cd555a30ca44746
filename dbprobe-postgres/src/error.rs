//! Error types for PostgreSQL probes.

use std::error::Error as StdError;

use dbprobe_core::{DriverError, DriverId, chain_message, io_kind_in_chain};
use thiserror::Error;

/// Result type for PostgreSQL probes.
pub type PgResult<T> = Result<T, PgError>;

/// Errors that can occur while probing PostgreSQL.
#[derive(Error, Debug)]
pub enum PgError {
    /// PostgreSQL error.
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// The config cannot be expressed for this driver.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The server closed the connection before the handshake finished.
    #[error("connection closed before the handshake completed")]
    Closed,
}

impl PgError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// SQLSTATE reported by the server, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Postgres(e) => e.code().map(|c| c.code()),
            _ => None,
        }
    }
}

impl From<PgError> for DriverError {
    fn from(err: PgError) -> Self {
        match err {
            PgError::Postgres(e) => {
                let code = e.code().map(|c| c.code().to_string());
                let db_message = e
                    .as_db_error()
                    .map(|db| format!("{}: {}", db.severity(), db.message()));
                driver_error(code, db_message, &e)
            }
            other => DriverError::new(DriverId::Postgres, other.to_string()),
        }
    }
}

/// Server messages are used as-is; client-side failures carry their whole
/// source chain, since `tokio_postgres` hides the cause in `Display`.
fn driver_error(
    code: Option<String>,
    db_message: Option<String>,
    err: &(dyn StdError + 'static),
) -> DriverError {
    DriverError {
        driver: DriverId::Postgres,
        code,
        io_kind: io_kind_in_chain(err),
        message: db_message.unwrap_or_else(|| chain_message(err)),
    }
}
