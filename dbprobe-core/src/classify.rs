//! Maps driver errors onto the shared [`ErrorKind`] taxonomy.
//!
//! Each driver crate converts its native error into a [`DriverError`],
//! keeping the server error code and any I/O error kind found on the source
//! chain. [`classify`] then applies, in order: the driver's code table, the
//! I/O kind, and finally message heuristics.
//!
//! ```rust
//! use dbprobe_core::{classify, DriverError, DriverId, ErrorKind};
//!
//! let err = DriverError::new(DriverId::Postgres, "password authentication failed for user \"app\"")
//!     .with_code("28P01");
//! assert_eq!(classify(&err), ErrorKind::AuthFailure);
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::dialect::DriverId;
use crate::error::ErrorKind;

/// A driver failure reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    /// Driver that produced the error.
    pub driver: DriverId,
    /// Server or library error code (SQLSTATE, MySQL/SQL Server number, SQLite result code).
    pub code: Option<String>,
    /// I/O error kind found on the source chain.
    pub io_kind: Option<io::ErrorKind>,
    /// Driver message.
    pub message: String,
}

impl DriverError {
    /// Create a driver error with only a message.
    pub fn new(driver: DriverId, message: impl Into<String>) -> Self {
        Self {
            driver,
            code: None,
            io_kind: None,
            message: message.into(),
        }
    }

    /// Attach an error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach an I/O error kind.
    pub fn with_io_kind(mut self, kind: io::ErrorKind) -> Self {
        self.io_kind = Some(kind);
        self
    }

    /// Build from an error, walking its source chain for an I/O kind and
    /// the full message.
    pub fn from_error(driver: DriverId, err: &(dyn StdError + 'static)) -> Self {
        Self {
            driver,
            code: None,
            io_kind: io_kind_in_chain(err),
            message: chain_message(err),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        classify(self)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} error {}: {}", self.driver, code, self.message),
            None => write!(f, "{} error: {}", self.driver, self.message),
        }
    }
}

impl StdError for DriverError {}

/// Find the first [`io::Error`] on an error's source chain.
pub fn io_kind_in_chain(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<io::Error>() {
            return Some(io.kind());
        }
        current = err.source();
    }
    None
}

/// Join an error's message with those of its sources.
///
/// Sources whose text already appears in the message are skipped, so
/// wrappers that print their cause are not repeated.
pub fn chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        let text = source.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = source.source();
    }
    message
}

/// Classify a driver error. Never fails; unrecognized errors are `Unknown`.
pub fn classify(err: &DriverError) -> ErrorKind {
    err.code
        .as_deref()
        .and_then(|code| classify_code(err.driver, code))
        .or_else(|| err.io_kind.and_then(classify_io))
        .or_else(|| classify_message(&err.message))
        .unwrap_or(ErrorKind::Unknown)
}

fn classify_code(driver: DriverId, code: &str) -> Option<ErrorKind> {
    let code = code.trim();
    match driver {
        DriverId::Postgres => match code {
            "28P01" | "28000" => Some(ErrorKind::AuthFailure),
            "08001" | "08006" => Some(ErrorKind::HostUnreachable),
            "57014" => Some(ErrorKind::Timeout),
            _ => None,
        },
        DriverId::MySql => match code {
            "1045" | "1044" | "1698" | "1251" => Some(ErrorKind::AuthFailure),
            "2002" | "2003" | "2005" | "1040" => Some(ErrorKind::HostUnreachable),
            _ => None,
        },
        DriverId::Mssql => match code {
            "18456" | "18452" | "18470" | "18486" | "18487" | "18488" => {
                Some(ErrorKind::AuthFailure)
            }
            "-2" => Some(ErrorKind::Timeout),
            _ => None,
        },
        // Extended result codes carry the primary code in the low byte.
        DriverId::Sqlite => match code.parse::<i32>().ok()? & 0xff {
            14 => Some(ErrorKind::HostUnreachable),
            23 | 3 => Some(ErrorKind::AuthFailure),
            26 => Some(ErrorKind::MalformedInput),
            _ => None,
        },
    }
}

fn classify_io(kind: io::ErrorKind) -> Option<ErrorKind> {
    use io::ErrorKind as Io;
    match kind {
        Io::ConnectionRefused
        | Io::ConnectionReset
        | Io::ConnectionAborted
        | Io::HostUnreachable
        | Io::NetworkUnreachable
        | Io::AddrNotAvailable
        | Io::NotFound => Some(ErrorKind::HostUnreachable),
        Io::TimedOut => Some(ErrorKind::Timeout),
        Io::InvalidInput => Some(ErrorKind::MalformedInput),
        _ => None,
    }
}

const MESSAGE_RULES: &[(&str, ErrorKind)] = &[
    ("failed to lookup address", ErrorKind::HostUnreachable),
    ("name or service not known", ErrorKind::HostUnreachable),
    ("no such host", ErrorKind::HostUnreachable),
    ("nodename nor servname", ErrorKind::HostUnreachable),
    ("connection refused", ErrorKind::HostUnreachable),
    ("password authentication failed", ErrorKind::AuthFailure),
    ("access denied", ErrorKind::AuthFailure),
    ("login failed", ErrorKind::AuthFailure),
    ("timed out", ErrorKind::Timeout),
    ("invalid connection string", ErrorKind::MalformedInput),
    ("invalid configuration", ErrorKind::MalformedInput),
];

fn classify_message(message: &str) -> Option<ErrorKind> {
    let message = message.to_lowercase();
    MESSAGE_RULES
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|&(_, kind)| kind)
}
