//! The two entry points used by the request layer.
//!
//! ```rust
//! use dbprobe_core::{ConnectionService, ErrorKind, Prober};
//!
//! let service = ConnectionService::new(Prober::default());
//!
//! let config = service.resolve_only("mysql://root:secret@db:3307/shop").unwrap();
//! assert_eq!(config.dialect, "mysql2");
//! assert_eq!(config.port, Some(3307));
//!
//! let err = service.resolve_only("foobar://host/db").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::UnsupportedDialect);
//! ```

use std::time::Duration;

use tracing::debug;

use crate::descriptor::ConnectionDescriptor;
use crate::dialect::DialectRegistry;
use crate::error::{ResolveError, ResolveResult};
use crate::normalize::{CanonicalConfig, NormalizeInput, normalize};
use crate::parser;
use crate::probe::{ProbeResult, Prober};

/// Resolves descriptors and probes them.
#[derive(Debug, Clone)]
pub struct ConnectionService {
    registry: &'static DialectRegistry,
    prober: Prober,
}

impl ConnectionService {
    /// Create a service over the global dialect registry.
    pub fn new(prober: Prober) -> Self {
        Self {
            registry: DialectRegistry::global(),
            prober,
        }
    }

    /// The prober in use.
    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    /// The dialect registry in use.
    pub fn registry(&self) -> &'static DialectRegistry {
        self.registry
    }

    /// Translate a connection URL into a canonical config without any I/O.
    pub fn resolve_only(&self, url: &str) -> ResolveResult<CanonicalConfig> {
        let parsed = parser::parse_partial(url)?;
        let profile = self.registry.resolve(&parsed.scheme)?;
        if profile.is_network() && parsed.database.is_none() {
            return Err(ResolveError::malformed(
                "connection URL is missing a database path",
            ));
        }
        normalize(&parsed, profile)
    }

    /// Resolve any descriptor into a canonical config.
    ///
    /// For structured descriptors the dialect comes from the explicit field,
    /// falling back to the scheme of the embedded URL.
    pub fn resolve(&self, descriptor: &ConnectionDescriptor) -> ResolveResult<CanonicalConfig> {
        match descriptor {
            ConnectionDescriptor::UrlString { value } => self.resolve_only(value),
            ConnectionDescriptor::StructuredDescriptor(body) => {
                let url = body
                    .url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .map(parser::parse_partial)
                    .transpose()?;

                let alias = body
                    .dialect
                    .as_deref()
                    .filter(|d| !d.trim().is_empty())
                    .or_else(|| url.as_ref().map(|u| u.scheme.as_str()))
                    .ok_or_else(|| {
                        ResolveError::malformed("descriptor does not name a dialect")
                    })?;
                let profile = self.registry.resolve(alias)?;

                normalize(
                    NormalizeInput::Structured {
                        body,
                        url: url.as_ref(),
                    },
                    profile,
                )
            }
        }
    }

    /// Resolve a descriptor and probe it with the default timeout.
    pub async fn resolve_and_probe(
        &self,
        descriptor: ConnectionDescriptor,
    ) -> ResolveResult<ProbeResult> {
        self.resolve_and_probe_with_timeout(descriptor, Duration::ZERO)
            .await
    }

    /// Resolve a descriptor and probe it, giving up after `timeout`.
    ///
    /// A zero timeout selects the prober's default.
    pub async fn resolve_and_probe_with_timeout(
        &self,
        descriptor: ConnectionDescriptor,
        timeout: Duration,
    ) -> ResolveResult<ProbeResult> {
        let config = self.resolve(&descriptor)?;
        drop(descriptor);
        debug!(dialect = %config.dialect, "Descriptor resolved");
        Ok(self.prober.probe(&config, timeout).await)
    }
}
