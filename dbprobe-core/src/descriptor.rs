//! Caller-supplied connection descriptors.
//!
//! A descriptor arrives already deserialized from the request body and is
//! tagged with an explicit `kind`:
//!
//! ```rust
//! use dbprobe_core::ConnectionDescriptor;
//!
//! let url: ConnectionDescriptor = serde_json::from_str(
//!     r#"{"kind": "UrlString", "value": "postgres://u:p@db/app"}"#,
//! ).unwrap();
//! assert!(matches!(url, ConnectionDescriptor::UrlString { .. }));
//!
//! let structured: ConnectionDescriptor = serde_json::from_str(
//!     r#"{"kind": "StructuredDescriptor", "client": "mysql", "host": "db", "database": "app"}"#,
//! ).unwrap();
//! assert!(matches!(structured, ConnectionDescriptor::StructuredDescriptor(_)));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};
use crate::options::{SslMode, SslOptions};

/// Raw connection input, consumed once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ConnectionDescriptor {
    /// Individual connection fields.
    StructuredDescriptor(StructuredDescriptor),
    /// A single connection URL.
    UrlString {
        /// The URL text.
        value: String,
    },
}

impl ConnectionDescriptor {
    /// Wrap a URL string.
    pub fn url(value: impl Into<String>) -> Self {
        Self::UrlString {
            value: value.into(),
        }
    }
}

impl From<StructuredDescriptor> for ConnectionDescriptor {
    fn from(body: StructuredDescriptor) -> Self {
        Self::StructuredDescriptor(body)
    }
}

/// Structured connection fields.
///
/// Every field is optional; normalization decides what is required for the
/// resolved dialect.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDescriptor {
    /// Dialect alias. `client` is accepted as well.
    #[serde(default, alias = "client")]
    pub dialect: Option<String>,
    /// URL whose fields fill in anything not set explicitly.
    #[serde(default, alias = "connectionString")]
    pub url: Option<String>,
    /// Host name or address.
    #[serde(default)]
    pub host: Option<String>,
    /// Port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Username.
    #[serde(default)]
    pub user: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
    /// Database name.
    #[serde(default)]
    pub database: Option<String>,
    /// Database file for file-based dialects.
    #[serde(default)]
    pub filename: Option<String>,
    /// SSL settings.
    #[serde(default)]
    pub ssl: Option<SslInput>,
    /// Requested pool bounds. Always replaced during normalization.
    #[serde(default)]
    pub pool: Option<PoolHints>,
    /// Extra driver options.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl StructuredDescriptor {
    /// Create a descriptor for a dialect.
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: Some(dialect.into()),
            ..Default::default()
        }
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the database file.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set a base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set requested pool bounds.
    pub fn pool(mut self, min: u64, max: u64) -> Self {
        self.pool = Some(PoolHints {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    /// Set an extra option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for StructuredDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredDescriptor")
            .field("dialect", &self.dialect)
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("filename", &self.filename)
            .field("ssl", &self.ssl)
            .field("pool", &self.pool)
            .field("options", &self.options)
            .finish()
    }
}

/// Caller pool request. Accepted for compatibility and then discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolHints {
    /// Requested minimum.
    #[serde(default)]
    pub min: Option<u64>,
    /// Requested maximum.
    #[serde(default)]
    pub max: Option<u64>,
}

/// SSL as written by callers: a flag, a mode name, or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SslInput {
    /// `true` requires SSL, `false` disables it.
    Flag(bool),
    /// A mode name such as `verify-full`.
    Mode(String),
    /// Detailed settings.
    Options(SslInputOptions),
}

/// Object form of [`SslInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslInputOptions {
    /// Mode name.
    #[serde(default)]
    pub mode: Option<String>,
    /// CA certificate path.
    #[serde(default)]
    pub ca: Option<String>,
    /// Client certificate path.
    #[serde(default)]
    pub cert: Option<String>,
    /// Client key path.
    #[serde(default)]
    pub key: Option<String>,
    /// `false` skips server certificate validation.
    #[serde(default)]
    pub reject_unauthorized: Option<bool>,
    /// `true` skips server certificate validation.
    #[serde(default)]
    pub trust_server_certificate: Option<bool>,
}

impl SslInput {
    /// Apply this input on top of `base`, which holds URL-derived settings.
    pub fn apply(&self, base: SslOptions) -> ResolveResult<SslOptions> {
        match self {
            Self::Flag(true) => Ok(SslOptions {
                mode: SslMode::Require,
                ..base
            }),
            Self::Flag(false) => Ok(SslOptions {
                mode: SslMode::Disable,
                ..base
            }),
            Self::Mode(mode) => Ok(SslOptions {
                mode: parse_mode(mode)?,
                ..base
            }),
            Self::Options(opts) => {
                let mut ssl = base;
                // An object without a mode still asks for encryption.
                ssl.mode = match opts.mode.as_deref() {
                    Some(mode) => parse_mode(mode)?,
                    None if ssl.mode.is_required() => ssl.mode,
                    None => SslMode::Require,
                };
                if let Some(ca) = non_empty(&opts.ca) {
                    ssl.ca_cert = Some(ca);
                }
                if let Some(cert) = non_empty(&opts.cert) {
                    ssl.client_cert = Some(cert);
                }
                if let Some(key) = non_empty(&opts.key) {
                    ssl.client_key = Some(key);
                }
                if opts.reject_unauthorized == Some(false) {
                    ssl.trust_server_certificate = true;
                }
                if let Some(trust) = opts.trust_server_certificate {
                    ssl.trust_server_certificate = trust;
                }
                Ok(ssl)
            }
        }
    }
}

fn parse_mode(mode: &str) -> ResolveResult<SslMode> {
    SslMode::parse(mode)
        .ok_or_else(|| ResolveError::malformed(format!("invalid ssl mode: '{mode}'")))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
