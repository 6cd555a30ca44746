//! Error types for MySQL probes.

use dbprobe_core::{DriverError, DriverId};
use mysql_async::IoError;
use thiserror::Error;

/// Result type for MySQL probes.
pub type MysqlResult<T> = Result<T, MysqlError>;

/// Errors that can occur while probing MySQL.
#[derive(Error, Debug)]
pub enum MysqlError {
    /// MySQL driver error.
    #[error("mysql error: {0}")]
    Mysql(#[from] mysql_async::Error),

    /// The config cannot be expressed for this driver.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MysqlError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<MysqlError> for DriverError {
    fn from(err: MysqlError) -> Self {
        let err = match err {
            MysqlError::Mysql(e) => e,
            other => return DriverError::new(DriverId::MySql, other.to_string()),
        };

        match &err {
            mysql_async::Error::Server(server) => {
                DriverError::new(DriverId::MySql, server.message.clone())
                    .with_code(server.code.to_string())
            }
            mysql_async::Error::Io(IoError::Io(io)) => {
                DriverError::new(DriverId::MySql, io.to_string()).with_io_kind(io.kind())
            }
            _ => DriverError::from_error(DriverId::MySql, &err),
        }
    }
}
