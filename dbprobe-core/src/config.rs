//! `dbprobe.toml` configuration.
//!
//! ```toml
//! [probe]
//! default_timeout = "10s"
//! max_timeout = "60s"
//!
//! [version]
//! file = "./public/nc.txt"
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```
//!
//! Variable references (`${VAR}`, `${VAR:-default}`) in the file are expanded
//! before parsing. `DBPROBE_PROBE_TIMEOUT_MS` overrides the default timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::{EnvExpander, EnvSource, ProcessEnv};
use crate::error::{ConfigError, ConfigResult};
use crate::probe::ProbeSettings;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "dbprobe.toml";

/// Environment variable overriding the default probe timeout, in milliseconds.
pub const TIMEOUT_ENV: &str = "DBPROBE_PROBE_TIMEOUT_MS";

/// Root of `dbprobe.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DbProbeConfig {
    /// Probe timeouts.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Version string source.
    #[serde(default)]
    pub version: VersionConfig,

    /// Logging defaults.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[probe]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Timeout used when a request does not give one.
    #[serde(default = "default_timeout")]
    pub default_timeout: String,

    /// Cap on any requested timeout.
    #[serde(default = "default_max_timeout")]
    pub max_timeout: String,
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_max_timeout() -> String {
    "60s".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_timeout: default_timeout(),
            max_timeout: default_max_timeout(),
        }
    }
}

impl ProbeConfig {
    /// Parse the section into prober settings.
    pub fn settings(&self) -> ConfigResult<ProbeSettings> {
        let default_timeout = parse_duration("probe.default_timeout", &self.default_timeout)?;
        let max_timeout = parse_duration("probe.max_timeout", &self.max_timeout)?;

        if default_timeout.is_zero() {
            return Err(ConfigError::invalid_value(
                "probe.default_timeout",
                "must be greater than zero",
            ));
        }
        if max_timeout < default_timeout {
            return Err(ConfigError::invalid_value(
                "probe.max_timeout",
                format!(
                    "must not be below default_timeout ({})",
                    self.default_timeout
                ),
            ));
        }

        Ok(ProbeSettings {
            default_timeout,
            max_timeout,
        })
    }
}

/// `[version]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionConfig {
    /// File holding the version string.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level filter, e.g. `info` or `dbprobe_core=debug`.
    #[serde(default)]
    pub level: Option<String>,

    /// `json`, `pretty` or `compact`.
    #[serde(default)]
    pub format: Option<String>,
}

impl DbProbeConfig {
    /// Load from a file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "Loading config file");
        Self::parse_with_env(&content, &ProcessEnv)
    }

    /// Parse TOML text after expanding variables from the process environment.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Self::parse_with_env(content, &ProcessEnv)
    }

    /// Parse TOML text after expanding variables from `env`.
    pub fn parse_with_env<S: EnvSource + Clone>(content: &str, env: &S) -> ConfigResult<Self> {
        let expanded = EnvExpander::with_source(env.clone()).expand(content)?;
        let config: Self = toml::from_str(&expanded)?;
        config.probe.settings()?;
        Ok(config)
    }

    /// Load `path` if given, else `dbprobe.toml` when present, else defaults.
    /// A path given explicitly must exist.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Probe settings with the environment override applied.
    pub fn probe_settings(&self) -> ConfigResult<ProbeSettings> {
        self.probe_settings_with_env(&ProcessEnv)
    }

    /// Probe settings with overrides taken from `env`.
    pub fn probe_settings_with_env(&self, env: &impl EnvSource) -> ConfigResult<ProbeSettings> {
        let mut settings = self.probe.settings()?;
        if let Some(raw) = env.get(TIMEOUT_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnvValue {
                name: TIMEOUT_ENV.to_string(),
                message: format!("expected milliseconds, got '{raw}'"),
            })?;
            settings.default_timeout = Duration::from_millis(ms).min(settings.max_timeout);
        }
        Ok(settings)
    }
}

/// Parse a duration such as `500ms`, `10s` or `2m`. A bare number is seconds.
pub fn parse_duration(key: &str, value: &str) -> ConfigResult<Duration> {
    let invalid = || ConfigError::InvalidDuration {
        key: key.to_string(),
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(amount)),
        "" | "s" => Ok(Duration::from_secs(amount)),
        "m" => amount
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvSource;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DbProbeConfig::default();
        let settings = config.probe.settings().unwrap();
        assert_eq!(settings, ProbeSettings::default());
        assert_eq!(config.version.file, None);
    }

    #[test]
    fn test_parse_full() {
        let config = DbProbeConfig::parse_with_env(
            r#"
            [probe]
            default_timeout = "2500ms"
            max_timeout = "2m"

            [version]
            file = "./public/nc.txt"

            [logging]
            level = "debug"
            format = "json"
            "#,
            &MapEnvSource::new(),
        )
        .unwrap();
        let settings = config.probe.settings().unwrap();
        assert_eq!(settings.default_timeout, Duration::from_millis(2500));
        assert_eq!(settings.max_timeout, Duration::from_secs(120));
        assert_eq!(config.version.file, Some(PathBuf::from("./public/nc.txt")));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_env_expansion() {
        let env = MapEnvSource::new().set("PROBE_TIMEOUT", "3s");
        let config = DbProbeConfig::parse_with_env(
            "[probe]\ndefault_timeout = \"${PROBE_TIMEOUT}\"\nmax_timeout = \"${PROBE_MAX:-30s}\"\n",
            &env,
        )
        .unwrap();
        let settings = config.probe.settings().unwrap();
        assert_eq!(settings.default_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = DbProbeConfig::parse_with_env("[probe]\nretries = 3\n", &MapEnvSource::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_inconsistent_timeouts_rejected() {
        let err = DbProbeConfig::parse_with_env(
            "[probe]\ndefault_timeout = \"30s\"\nmax_timeout = \"5s\"\n",
            &MapEnvSource::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_timeout_env_override() {
        let env = MapEnvSource::new().set(TIMEOUT_ENV, "1500");
        let settings = DbProbeConfig::default()
            .probe_settings_with_env(&env)
            .unwrap();
        assert_eq!(settings.default_timeout, Duration::from_millis(1500));

        let env = MapEnvSource::new().set(TIMEOUT_ENV, "soon");
        assert!(
            DbProbeConfig::default()
                .probe_settings_with_env(&env)
                .is_err()
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("k", "250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("k", "10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("k", " 7 ").unwrap(), Duration::from_secs(7));
        assert_eq!(parse_duration("k", "1m").unwrap(), Duration::from_secs(60));
        assert!(parse_duration("k", "ten").is_err());
        assert!(parse_duration("k", "10h").is_err());
        assert!(parse_duration("k", "").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[probe]\ndefault_timeout = \"4s\"").unwrap();
        let config = DbProbeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.probe.default_timeout, "4s");
        assert_eq!(config.probe.max_timeout, "60s");
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = DbProbeConfig::load(Some(Path::new("/nonexistent/dbprobe.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
