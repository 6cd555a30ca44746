//! SQLite probe connector.

use async_trait::async_trait;
use dbprobe_core::{CanonicalConfig, Connector, DriverError, DriverId};
use rusqlite::OpenFlags;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::SqliteResult;

/// Opens the database file and reads its header.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

/// Flags used to open the file. The file is never created; `mode=ro`
/// opens it read-only.
pub fn open_flags(config: &CanonicalConfig) -> OpenFlags {
    let access = match config.option("mode") {
        Some("ro") => OpenFlags::SQLITE_OPEN_READ_ONLY,
        _ => OpenFlags::SQLITE_OPEN_READ_WRITE,
    };
    access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
}

impl SqliteConnector {
    /// Create a new connector.
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, config: &CanonicalConfig) -> SqliteResult<()> {
        let conn = Connection::open_with_flags(&config.database, open_flags(config)).await?;

        let checked = conn
            .call(|c| {
                c.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                // Forces a read of the header, so non-database files fail here.
                c.pragma_query_value(None, "schema_version", |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await;

        match conn.close().await {
            Ok(()) => {}
            Err(e) if checked.is_err() => debug!(error = %e, "SQLite close after failed check"),
            Err(e) => return Err(e.into()),
        }

        Ok(checked?)
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    fn driver(&self) -> DriverId {
        DriverId::Sqlite
    }

    async fn handshake(&self, config: &CanonicalConfig) -> Result<(), DriverError> {
        self.run(config).await.map_err(DriverError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbprobe_core::{ConnectionService, ErrorKind, ProbeStatus, Prober, StructuredDescriptor};
    use std::path::Path;
    use std::time::Duration;

    fn service() -> ConnectionService {
        ConnectionService::new(Prober::builder().connector(SqliteConnector::new()).build())
    }

    async fn probe_file(path: &Path) -> dbprobe_core::ProbeResult {
        let body = StructuredDescriptor::new("sqlite3").filename(path.display().to_string());
        service()
            .resolve_and_probe_with_timeout(body.into(), Duration::from_secs(5))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_existing_database_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY);")
            .unwrap();

        let result = probe_file(&path).await;
        assert_eq!(result.status, ProbeStatus::Succeeded, "{result:?}");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let result = probe_file(&path).await;
        assert_eq!(result.error_kind, Some(ErrorKind::HostUnreachable));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "this is not a database\n".repeat(200)).unwrap();

        let result = probe_file(&path).await;
        assert_eq!(result.error_kind, Some(ErrorKind::MalformedInput));
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let config = service().resolve_only("sqlite::memory:").unwrap();
        assert_eq!(config.database, ":memory:");

        let result = service().prober().probe(&config, Duration::from_secs(5)).await;
        assert_eq!(result.status, ProbeStatus::Succeeded, "{result:?}");
    }

    #[test]
    fn test_read_only_mode() {
        let config = service().resolve_only("sqlite:///tmp/app.db?mode=ro").unwrap();
        assert!(open_flags(&config).contains(OpenFlags::SQLITE_OPEN_READ_ONLY));
        assert!(!open_flags(&config).contains(OpenFlags::SQLITE_OPEN_CREATE));
    }
}
