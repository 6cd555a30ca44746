//! MySQL probe connector.

use async_trait::async_trait;
use dbprobe_core::{CanonicalConfig, Connector, DriverError, DriverId};
use mysql_async::Conn;
use mysql_async::prelude::Queryable;
use tracing::debug;

use crate::config::to_opts;
use crate::error::MysqlResult;

/// Pings the server over a fresh connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

impl MysqlConnector {
    /// Create a new connector.
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, config: &CanonicalConfig) -> MysqlResult<()> {
        let opts = to_opts(config)?;
        let mut conn = Conn::new(opts).await?;

        match conn.ping().await {
            Ok(()) => {
                conn.disconnect().await?;
                Ok(())
            }
            Err(e) => {
                // The error is what matters; the connection is dropped either way.
                if let Err(close) = conn.disconnect().await {
                    debug!(error = %close, "MySQL disconnect after failed ping");
                }
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl Connector for MysqlConnector {
    fn driver(&self) -> DriverId {
        DriverId::MySql
    }

    async fn handshake(&self, config: &CanonicalConfig) -> Result<(), DriverError> {
        self.run(config).await.map_err(DriverError::from)
    }
}
