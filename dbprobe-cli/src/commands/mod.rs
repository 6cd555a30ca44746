//! CLI command implementations.

pub mod dialects;
pub mod probe;
pub mod resolve;
pub mod version;

use dbprobe::{ConnectionService, DbProbeConfig};

use crate::error::CliResult;

/// State shared by every command.
#[derive(Debug)]
pub struct Context {
    /// Loaded configuration.
    pub config: DbProbeConfig,
    /// Service with every compiled-in driver.
    pub service: ConnectionService,
}

impl Context {
    /// Build the context from loaded configuration.
    pub fn new(config: DbProbeConfig) -> CliResult<Self> {
        let service = dbprobe::service(&config)?;
        Ok(Self { config, service })
    }
}
