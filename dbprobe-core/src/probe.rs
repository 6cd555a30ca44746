//! Bounded connectivity probes.
//!
//! A [`Prober`] owns one [`Connector`] per driver. Each probe runs a single
//! handshake against a client that belongs only to that call, raced against
//! a timer. The client lives inside the handshake future, so it is torn down
//! whenever that future completes or is dropped, including on timeout and
//! when the caller cancels the probe.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use dbprobe_core::{Prober, CanonicalConfig};
//!
//! # async fn example(prober: Prober, config: CanonicalConfig) {
//! let result = prober.probe(&config, Duration::from_secs(5)).await;
//! println!("{:?} in {:?}", result.status, result.latency);
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::classify::{DriverError, classify};
use crate::dialect::DriverId;
use crate::error::ErrorKind;
use crate::normalize::CanonicalConfig;

/// Opens a throwaway client and runs a minimal round trip.
///
/// Implementations must own every resource they open inside the returned
/// future and close it gracefully before returning. Dropping the future
/// must release everything.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Driver this connector serves.
    fn driver(&self) -> DriverId;

    /// Connect, run the handshake query and disconnect.
    async fn handshake(&self, config: &CanonicalConfig) -> Result<(), DriverError>;
}

/// Terminal state of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProbeStatus {
    /// The handshake completed.
    Succeeded,
    /// The handshake failed or timed out.
    Failed,
}

/// Outcome of exactly one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    /// Terminal state.
    pub status: ProbeStatus,
    /// Wall time spent in the probe.
    #[serde(rename = "latencyMs", serialize_with = "serialize_millis")]
    pub latency: Duration,
    /// Failure classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeResult {
    /// A successful probe.
    pub fn succeeded(latency: Duration) -> Self {
        Self {
            status: ProbeStatus::Succeeded,
            latency,
            error_kind: None,
            message: None,
        }
    }

    /// A failed probe.
    pub fn failed(kind: ErrorKind, message: impl Into<String>, latency: Duration) -> Self {
        Self {
            status: ProbeStatus::Failed,
            latency,
            error_kind: Some(kind),
            message: Some(message.into()),
        }
    }

    /// Whether the probe succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Succeeded
    }

    /// Latency in whole milliseconds.
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX)
    }
}

fn serialize_millis<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(latency.as_millis()).unwrap_or(u64::MAX))
}

/// Timeout bounds applied to every probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Used when a caller passes a zero timeout.
    pub default_timeout: Duration,
    /// Upper bound for any timeout.
    pub max_timeout: Duration,
}

impl ProbeSettings {
    /// Default probe timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default upper bound.
    pub const MAX_TIMEOUT: Duration = Duration::from_secs(60);

    /// Resolve the timeout to use for a request.
    pub fn effective_timeout(&self, requested: Duration) -> Duration {
        let requested = if requested.is_zero() {
            self.default_timeout
        } else {
            requested
        };
        requested.min(self.max_timeout)
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            default_timeout: Self::DEFAULT_TIMEOUT,
            max_timeout: Self::MAX_TIMEOUT,
        }
    }
}

/// Runs probes through registered connectors.
///
/// Cheap to clone; the connector table is immutable and shared.
#[derive(Clone, Default)]
pub struct Prober {
    connectors: Arc<HashMap<DriverId, Arc<dyn Connector>>>,
    settings: ProbeSettings,
}

impl Prober {
    /// Start building a prober.
    pub fn builder() -> ProberBuilder {
        ProberBuilder::default()
    }

    /// Timeout settings.
    pub fn settings(&self) -> ProbeSettings {
        self.settings
    }

    /// Whether a connector is registered for `driver`.
    pub fn supports(&self, driver: DriverId) -> bool {
        self.connectors.contains_key(&driver)
    }

    /// Registered drivers.
    pub fn drivers(&self) -> Vec<DriverId> {
        let mut drivers: Vec<_> = self.connectors.keys().copied().collect();
        drivers.sort_by_key(|d| d.name());
        drivers
    }

    /// Probe `config`, giving up after `timeout`.
    ///
    /// Always returns a result. A zero timeout means the configured default,
    /// and any timeout is capped at the configured maximum.
    pub async fn probe(&self, config: &CanonicalConfig, timeout: Duration) -> ProbeResult {
        let timeout = self.settings.effective_timeout(timeout);

        let Some(connector) = self.connectors.get(&config.driver) else {
            warn!(dialect = %config.dialect, driver = %config.driver, "No connector registered");
            return ProbeResult::failed(
                ErrorKind::UnsupportedDialect,
                format!("no driver available for dialect '{}'", config.dialect),
                Duration::ZERO,
            );
        };

        debug!(
            dialect = %config.dialect,
            address = %config.address(),
            database = %config.database,
            timeout_ms = timeout.as_millis() as u64,
            "Starting probe"
        );

        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, connector.handshake(config)).await;
        let latency = start.elapsed();

        let result = match outcome {
            Ok(Ok(())) => ProbeResult::succeeded(latency),
            Ok(Err(err)) => {
                let kind = classify(&err);
                debug!(driver = %err.driver, code = ?err.code, io_kind = ?err.io_kind, "Driver error");
                ProbeResult::failed(kind, err.message, latency)
            }
            Err(_) => ProbeResult::failed(
                ErrorKind::Timeout,
                format!("probe timed out after {} ms", timeout.as_millis()),
                latency,
            ),
        };

        match &result.error_kind {
            None => info!(
                dialect = %config.dialect,
                address = %config.address(),
                latency_ms = result.latency_ms(),
                "Probe succeeded"
            ),
            Some(kind) => warn!(
                dialect = %config.dialect,
                address = %config.address(),
                latency_ms = result.latency_ms(),
                error_kind = %kind,
                "Probe failed"
            ),
        }

        result
    }
}

impl fmt::Debug for Prober {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prober")
            .field("drivers", &self.drivers())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for [`Prober`].
#[derive(Default)]
pub struct ProberBuilder {
    connectors: HashMap<DriverId, Arc<dyn Connector>>,
    settings: ProbeSettings,
}

impl ProberBuilder {
    /// Register a connector, replacing any previous one for its driver.
    pub fn connector(mut self, connector: impl Connector + 'static) -> Self {
        self.connectors
            .insert(connector.driver(), Arc::new(connector));
        self
    }

    /// Register a shared connector.
    pub fn shared_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connectors.insert(connector.driver(), connector);
        self
    }

    /// Set timeout settings.
    pub fn settings(mut self, settings: ProbeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the default timeout.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.settings.default_timeout = timeout;
        self
    }

    /// Set the maximum timeout.
    pub fn max_timeout(mut self, timeout: Duration) -> Self {
        self.settings.max_timeout = timeout;
        self
    }

    /// Build the prober.
    pub fn build(self) -> Prober {
        Prober {
            connectors: Arc::new(self.connectors),
            settings: self.settings,
        }
    }
}
