//! SQL Server probe connector.

use async_trait::async_trait;
use dbprobe_core::{CanonicalConfig, Connector, DriverError, DriverId};
use tiberius::Client;
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;

use crate::config::to_tiberius_config;
use crate::error::MssqlResult;

/// Logs in and runs `SELECT 1` over a fresh TDS connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlConnector;

impl MssqlConnector {
    /// Create a new connector.
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, config: &CanonicalConfig) -> MssqlResult<()> {
        let tds = to_tiberius_config(config)?;

        let tcp = TcpStream::connect(tds.get_addr()).await?;
        tcp.set_nodelay(true)?;
        debug!(addr = %tds.get_addr(), "TCP connection established");

        let mut client = Client::connect(tds, tcp.compat_write()).await?;
        client
            .simple_query("SELECT 1")
            .await?
            .into_first_result()
            .await?;
        client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Connector for MssqlConnector {
    fn driver(&self) -> DriverId {
        DriverId::Mssql
    }

    async fn handshake(&self, config: &CanonicalConfig) -> Result<(), DriverError> {
        self.run(config).await.map_err(DriverError::from)
    }
}
