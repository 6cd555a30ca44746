//! # dbprobe-core
//!
//! Driver-independent core of dbprobe: turns connection URLs and structured
//! descriptors into canonical configs, and runs bounded connectivity probes
//! through pluggable [`Connector`]s.
//!
//! A request moves through `parse -> resolve dialect -> normalize -> probe`
//! and ends either with a [`ProbeResult`] or a typed [`ResolveError`].
//!
//! ```rust
//! use dbprobe_core::{ConnectionService, Prober};
//!
//! let service = ConnectionService::new(Prober::default());
//! let config = service.resolve_only("postgresql://app:secret@db:5432/orders").unwrap();
//!
//! assert_eq!(config.dialect, "pg");
//! assert_eq!(config.pool.max, 1);
//! ```
//!
//! Driver connectors live in the `dbprobe-postgres`, `dbprobe-mysql`,
//! `dbprobe-mssql` and `dbprobe-sqlite` crates.

pub mod classify;
pub mod config;
pub mod descriptor;
pub mod dialect;
pub mod env;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod options;
pub mod parser;
pub mod probe;
pub mod service;
pub mod version;

pub use async_trait::async_trait;

pub use classify::{DriverError, chain_message, classify, io_kind_in_chain};
pub use config::DbProbeConfig;
pub use descriptor::{ConnectionDescriptor, PoolHints, SslInput, StructuredDescriptor};
pub use dialect::{DialectProfile, DialectRegistry, DriverId, Storage};
pub use error::{ConfigError, ConfigResult, ErrorKind, ResolveError, ResolveResult};
pub use normalize::{CanonicalConfig, NormalizeInput, normalize};
pub use options::{PoolSettings, SslMode, SslOptions};
pub use parser::ParsedUrl;
pub use probe::{Connector, ProbeResult, ProbeSettings, ProbeStatus, Prober, ProberBuilder};
pub use service::ConnectionService;
