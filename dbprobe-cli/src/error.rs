//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(dbprobe::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(dbprobe::config), help("check dbprobe.toml or the --config path"))]
    Config(#[from] dbprobe::ConfigError),

    /// The input could not be resolved into a connection config
    #[error("{} ({})", .0, .0.kind())]
    #[diagnostic(code(dbprobe::resolve))]
    Resolve(#[from] dbprobe::ResolveError),

    /// Descriptor file is not a valid descriptor
    #[error("Invalid descriptor: {0}")]
    #[diagnostic(
        code(dbprobe::descriptor),
        help("expected {{\"kind\": \"UrlString\", \"value\": ...}} or {{\"kind\": \"StructuredDescriptor\", ...}}")
    )]
    Descriptor(String),

    /// JSON output error
    #[error("JSON error: {0}")]
    #[diagnostic(code(dbprobe::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a descriptor error.
    pub fn descriptor(message: impl Into<String>) -> Self {
        Self::Descriptor(message.into())
    }
}
