//! Error taxonomy shared by every stage of resolution and probing.
//!
//! Two layers of errors exist:
//!
//! - [`ErrorKind`] is the stable, driver-agnostic taxonomy returned to callers.
//!   It is what the routing layer maps onto a transport status.
//! - [`ResolveError`] is the typed failure of the two entry points before any
//!   network I/O happens (parsing, dialect lookup, normalization).
//!
//! ```rust
//! use dbprobe_core::{ErrorKind, ResolveError};
//!
//! let err = ResolveError::unsupported_dialect("foobar");
//! assert_eq!(err.kind(), ErrorKind::UnsupportedDialect);
//! assert_eq!(err.kind().as_str(), "UNSUPPORTED_DIALECT");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Driver-agnostic classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The driver rejected the supplied credentials.
    AuthFailure,
    /// Network-level connect failure (refused, unresolvable, unreachable).
    HostUnreachable,
    /// The probe exceeded its time budget.
    Timeout,
    /// Scheme or alias is not present in the dialect registry.
    UnsupportedDialect,
    /// Structural parse failure or a missing required field.
    MalformedInput,
    /// Unclassified driver error.
    Unknown,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthFailure => "AUTH_FAILURE",
            Self::HostUnreachable => "HOST_UNREACHABLE",
            Self::Timeout => "TIMEOUT",
            Self::UnsupportedDialect => "UNSUPPORTED_DIALECT",
            Self::MalformedInput => "MALFORMED_INPUT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Short human description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AuthFailure => "Authentication failed",
            Self::HostUnreachable => "Database host unreachable",
            Self::Timeout => "Connection probe timed out",
            Self::UnsupportedDialect => "Unsupported database dialect",
            Self::MalformedInput => "Malformed connection input",
            Self::Unknown => "Unknown database error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of an entry point before a probe is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "errorKind", content = "message")]
pub enum ResolveError {
    /// Structural parse failure or missing required field.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The scheme or alias is not registered.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),
}

impl ResolveError {
    /// Create a malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Create an unsupported dialect error.
    pub fn unsupported_dialect(alias: impl Into<String>) -> Self {
        Self::UnsupportedDialect(alias.into())
    }

    /// The taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::UnsupportedDialect(_) => ErrorKind::UnsupportedDialect,
        }
    }

    /// The error detail without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::MalformedInput(msg) | Self::UnsupportedDialect(msg) => msg,
        }
    }
}

/// Errors raised while loading `dbprobe.toml` or the process environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Environment variable not found.
    #[error("environment variable not found: {0}")]
    EnvNotFound(String),

    /// Invalid environment variable value.
    #[error("invalid environment variable '{name}': {message}")]
    InvalidEnvValue { name: String, message: String },

    /// A duration setting could not be parsed.
    #[error("invalid duration for '{key}': '{value}' (expected e.g. 500ms, 10s, 1m)")]
    InvalidDuration { key: String, value: String },

    /// A setting holds an out-of-range or inconsistent value.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
