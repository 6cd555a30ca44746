//! Logging setup.
//!
//! The crates log through `tracing`. A subscriber is only installed when the
//! `tracing-subscriber` feature is on and logging was asked for.
//!
//! # Environment Variables
//!
//! - `DBPROBE_DEBUG=true|1|yes` - debug-level logging
//! - `DBPROBE_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `DBPROBE_LOG_FORMAT=json|pretty|compact` - output format (default: compact)
//!
//! Environment variables take precedence over the `[logging]` section of
//! `dbprobe.toml`.
//!
//! ```rust,no_run
//! use dbprobe_core::logging;
//!
//! logging::init();
//! ```

use std::sync::Once;

use crate::config::LoggingConfig;
use crate::env::{EnvSource, ProcessEnv};

static INIT: Once = Once::new();

const DEBUG_ENV: &str = "DBPROBE_DEBUG";
const LEVEL_ENV: &str = "DBPROBE_LOG_LEVEL";
const FORMAT_ENV: &str = "DBPROBE_LOG_FORMAT";

const TARGETS: &[&str] = &[
    "dbprobe",
    "dbprobe_core",
    "dbprobe_postgres",
    "dbprobe_mysql",
    "dbprobe_mssql",
    "dbprobe_sqlite",
    "dbprobe_cli",
];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human output.
    Pretty,
    /// Single-line human output.
    Compact,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to compact.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level, or `None` when logging stays off.
    pub level: Option<String>,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings from `env` and the config file section.
    pub fn resolve(config: &LoggingConfig, env: &impl EnvSource) -> Self {
        let debug = debug_flag(env);

        let level = env
            .get(LEVEL_ENV)
            .filter(|l| !l.trim().is_empty())
            .or_else(|| debug.then(|| "debug".to_string()))
            .or_else(|| config.level.clone());

        let format = env
            .get(FORMAT_ENV)
            .or_else(|| config.format.clone())
            .map(|f| LogFormat::parse(&f))
            .unwrap_or(LogFormat::Compact);

        Self { level, format }
    }

    /// `EnvFilter` directives for the workspace crates.
    ///
    /// A level that already contains directives is used verbatim.
    pub fn filter_directives(&self) -> Option<String> {
        let level = self.level.as_deref()?.trim();
        if level.contains('=') || level.contains(',') {
            return Some(level.to_string());
        }
        Some(
            TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Whether `DBPROBE_DEBUG` is set.
pub fn is_debug_enabled() -> bool {
    debug_flag(&ProcessEnv)
}

fn debug_flag(env: &impl EnvSource) -> bool {
    env.get(DEBUG_ENV)
        .is_some_and(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// Initialize logging from the environment only.
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize logging from the environment and a config section.
///
/// Only the first call has any effect.
pub fn init_with(config: &LoggingConfig) {
    INIT.call_once(|| {
        let settings = LogSettings::resolve(config, &ProcessEnv);
        let Some(directives) = settings.filter_directives() else {
            return;
        };

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter =
                EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
            let registry = tracing_subscriber::registry().with(filter);
            let installed = match settings.format {
                LogFormat::Json => registry
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init(),
                LogFormat::Pretty => registry
                    .with(fmt::layer().pretty().with_writer(std::io::stderr))
                    .try_init(),
                LogFormat::Compact => registry
                    .with(fmt::layer().compact().with_writer(std::io::stderr))
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::debug!(filter = %directives, format = ?settings.format, "Logging initialized");
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        let _ = directives;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvSource;

    #[test]
    fn test_logging_off_by_default() {
        let settings = LogSettings::resolve(&LoggingConfig::default(), &MapEnvSource::new());
        assert_eq!(settings.level, None);
        assert_eq!(settings.format, LogFormat::Compact);
        assert_eq!(settings.filter_directives(), None);
    }

    #[test]
    fn test_debug_flag() {
        let env = MapEnvSource::new().set(DEBUG_ENV, "1");
        let settings = LogSettings::resolve(&LoggingConfig::default(), &env);
        assert_eq!(settings.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_env_beats_config() {
        let config = LoggingConfig {
            level: Some("info".into()),
            format: Some("pretty".into()),
        };
        let env = MapEnvSource::new()
            .set(LEVEL_ENV, "trace")
            .set(FORMAT_ENV, "json");
        let settings = LogSettings::resolve(&config, &env);
        assert_eq!(settings.level.as_deref(), Some("trace"));
        assert_eq!(settings.format, LogFormat::Json);

        let settings = LogSettings::resolve(&config, &MapEnvSource::new());
        assert_eq!(settings.level.as_deref(), Some("info"));
        assert_eq!(settings.format, LogFormat::Pretty);
    }

    #[test]
    fn test_filter_directives() {
        let settings = LogSettings {
            level: Some("warn".into()),
            format: LogFormat::Compact,
        };
        let directives = settings.filter_directives().unwrap();
        assert!(directives.starts_with("dbprobe=warn,dbprobe_core=warn"));

        let custom = LogSettings {
            level: Some("dbprobe_core=trace".into()),
            format: LogFormat::Compact,
        };
        assert_eq!(custom.filter_directives().as_deref(), Some("dbprobe_core=trace"));
    }
}
