//! SSL, pool and free-form connection options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// SSL/TLS mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// Disable SSL.
    Disable,
    /// Allow SSL but don't require it.
    Allow,
    /// Prefer SSL but allow non-SSL.
    #[default]
    Prefer,
    /// Require SSL.
    Require,
    /// Require SSL and verify the server certificate.
    VerifyCa,
    /// Require SSL and verify the server certificate and hostname.
    VerifyFull,
}

impl SslMode {
    /// Parse from string.
    ///
    /// Accepts libpq names, MySQL names and boolean spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "disable" | "disabled" | "false" | "0" | "no" | "off" => Some(Self::Disable),
            "allow" => Some(Self::Allow),
            "prefer" | "preferred" => Some(Self::Prefer),
            "require" | "required" | "true" | "1" | "yes" | "on" => Some(Self::Require),
            "verify-ca" | "verify_ca" => Some(Self::VerifyCa),
            "verify-full" | "verify_full" | "verify_identity" | "verify-identity" => {
                Some(Self::VerifyFull)
            }
            _ => None,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }

    /// Whether the connection must be encrypted.
    pub fn is_required(&self) -> bool {
        *self >= Self::Require
    }

    /// Whether the server certificate must be verified.
    pub fn verifies_certificate(&self) -> bool {
        *self >= Self::VerifyCa
    }
}

/// SSL/TLS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslOptions {
    /// SSL mode.
    pub mode: SslMode,
    /// Path to CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    /// Path to client certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<String>,
    /// Path to client key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    /// Accept the server certificate without validation.
    #[serde(default)]
    pub trust_server_certificate: bool,
}

impl SslOptions {
    /// Create a new SSL config.
    pub fn new(mode: SslMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// Pool bounds attached to a canonical config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Minimum idle connections.
    pub min: u32,
    /// Maximum connections.
    pub max: u32,
}

impl PoolSettings {
    /// The only pool a resolved config may carry: nothing kept, at most one
    /// connection open.
    pub const SINGLE_USE: PoolSettings = PoolSettings { min: 0, max: 1 };
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::SINGLE_USE
    }
}

/// SSL settings and remaining options extracted from URL query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionOptions {
    /// SSL configuration.
    pub ssl: SslOptions,
    /// Parameters not consumed by a known key.
    pub extra: BTreeMap<String, String>,
}

impl ConnectionOptions {
    /// Parse options from URL query parameters.
    ///
    /// Unknown ssl values are rejected rather than silently downgraded.
    pub fn from_params(params: &BTreeMap<String, String>) -> ResolveResult<Self> {
        let mut opts = Self::default();

        for (key, value) in params {
            match key.as_str() {
                "sslmode" | "ssl-mode" | "ssl_mode" | "ssl" => {
                    opts.ssl.mode = SslMode::parse(value).ok_or_else(|| {
                        ResolveError::malformed(format!("invalid value for '{key}': '{value}'"))
                    })?;
                }
                "encrypt" => {
                    opts.ssl.mode = match parse_bool(value) {
                        Some(true) => SslMode::Require,
                        Some(false) => SslMode::Disable,
                        None => SslMode::parse(value).ok_or_else(|| {
                            ResolveError::malformed(format!(
                                "invalid value for 'encrypt': '{value}'"
                            ))
                        })?,
                    };
                }
                "trustServerCertificate" | "trust_server_certificate" | "trustservercertificate" => {
                    opts.ssl.trust_server_certificate = parse_bool(value).ok_or_else(|| {
                        ResolveError::malformed(format!("invalid value for '{key}': '{value}'"))
                    })?;
                }
                "sslrootcert" | "sslca" => opts.ssl.ca_cert = Some(value.clone()),
                "sslcert" => opts.ssl.client_cert = Some(value.clone()),
                "sslkey" => opts.ssl.client_key = Some(value.clone()),
                _ => {
                    opts.extra.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(opts)
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_ssl_mode_parse() {
        assert_eq!(SslMode::parse("disable"), Some(SslMode::Disable));
        assert_eq!(SslMode::parse("REQUIRED"), Some(SslMode::Require));
        assert_eq!(SslMode::parse("true"), Some(SslMode::Require));
        assert_eq!(SslMode::parse("verify_identity"), Some(SslMode::VerifyFull));
        assert_eq!(SslMode::parse("invalid"), None);
    }

    #[test]
    fn test_ssl_mode_ordering() {
        assert!(!SslMode::Prefer.is_required());
        assert!(SslMode::Require.is_required());
        assert!(!SslMode::Require.verifies_certificate());
        assert!(SslMode::VerifyFull.verifies_certificate());
    }

    #[test]
    fn test_options_from_params() {
        let opts = ConnectionOptions::from_params(&params(&[
            ("sslmode", "require"),
            ("sslrootcert", "/etc/ca.pem"),
            ("application_name", "myapp"),
        ]))
        .unwrap();
        assert_eq!(opts.ssl.mode, SslMode::Require);
        assert_eq!(opts.ssl.ca_cert.as_deref(), Some("/etc/ca.pem"));
        assert_eq!(opts.extra.get("application_name").map(String::as_str), Some("myapp"));
        assert!(!opts.extra.contains_key("sslmode"));
    }

    #[test]
    fn test_mssql_encrypt_params() {
        let opts = ConnectionOptions::from_params(&params(&[
            ("encrypt", "true"),
            ("trustServerCertificate", "true"),
        ]))
        .unwrap();
        assert_eq!(opts.ssl.mode, SslMode::Require);
        assert!(opts.ssl.trust_server_certificate);
    }

    #[test]
    fn test_invalid_ssl_value_rejected() {
        let err = ConnectionOptions::from_params(&params(&[("sslmode", "sometimes")])).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedInput(_)));
    }

    #[test]
    fn test_pool_default_is_single_use() {
        assert_eq!(PoolSettings::default(), PoolSettings { min: 0, max: 1 });
    }
}
