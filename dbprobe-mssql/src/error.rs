//! Error types for SQL Server probes.

use dbprobe_core::{DriverError, DriverId};
use thiserror::Error;

/// Result type for SQL Server probes.
pub type MssqlResult<T> = Result<T, MssqlError>;

/// Errors that can occur while probing SQL Server.
#[derive(Error, Debug)]
pub enum MssqlError {
    /// Tiberius error.
    #[error("sql server error: {0}")]
    Tiberius(#[from] tiberius::error::Error),

    /// TCP connect failure, before the TDS login starts.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The config cannot be expressed for this driver.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MssqlError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<MssqlError> for DriverError {
    fn from(err: MssqlError) -> Self {
        match err {
            MssqlError::Tiberius(tiberius::error::Error::Server(token)) => {
                DriverError::new(DriverId::Mssql, token.message().to_string())
                    .with_code(token.code().to_string())
            }
            MssqlError::Tiberius(tiberius::error::Error::Io { kind, message }) => {
                DriverError::new(DriverId::Mssql, message).with_io_kind(kind)
            }
            MssqlError::Tiberius(e) => DriverError::new(DriverId::Mssql, e.to_string()),
            MssqlError::Io(e) => DriverError::new(DriverId::Mssql, e.to_string()).with_io_kind(e.kind()),
            other @ MssqlError::Config(_) => DriverError::new(DriverId::Mssql, other.to_string()),
        }
    }
}
