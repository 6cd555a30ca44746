//! PostgreSQL probe connector.

use async_trait::async_trait;
use dbprobe_core::{CanonicalConfig, Connector, DriverError, DriverId};
use tokio_postgres::NoTls;
use tracing::debug;

use crate::config::to_pg_config;
use crate::error::{PgError, PgResult};

/// Runs `SELECT 1` over a fresh connection.
///
/// TLS is not negotiated: `prefer` falls back to plaintext and `require`
/// fails with a driver error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    /// Create a new connector.
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, config: &CanonicalConfig) -> PgResult<()> {
        let pg_config = to_pg_config(config)?;
        let (client, connection) = pg_config.connect(NoTls).await?;
        tokio::pin!(connection);

        let mut connection_done = false;
        let outcome = tokio::select! {
            res = client.simple_query("SELECT 1") => res.map(drop).map_err(PgError::from),
            res = &mut connection => {
                connection_done = true;
                Err(res.err().map(PgError::from).unwrap_or(PgError::Closed))
            }
        };

        // Dropping the client sends Terminate; the connection then completes.
        drop(client);
        if !connection_done {
            if let Err(e) = connection.await {
                debug!(error = %e, "PostgreSQL connection closed with error");
            }
        }

        outcome
    }
}

#[async_trait]
impl Connector for PgConnector {
    fn driver(&self) -> DriverId {
        DriverId::Postgres
    }

    async fn handshake(&self, config: &CanonicalConfig) -> Result<(), DriverError> {
        self.run(config).await.map_err(DriverError::from)
    }
}
