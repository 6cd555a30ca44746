//! Integration tests for probes through the real drivers.
//!
//! No database server is needed: the network drivers are pointed at local
//! ports that either refuse connections or accept them and never answer.

use dbprobe::{ConnectionDescriptor, ConnectionService, ErrorKind, ProbeStatus, StructuredDescriptor};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

const NETWORK_SCHEMES: &[&str] = &["postgres", "mysql", "mssql"];

fn service() -> ConnectionService {
    ConnectionService::new(dbprobe::default_prober())
}

/// A port on which nothing is listening.
fn refused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// A listener that completes TCP handshakes but never speaks.
async fn silent_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn url(scheme: &str, port: u16) -> ConnectionDescriptor {
    ConnectionDescriptor::url(format!("{scheme}://probe:secret@127.0.0.1:{port}/app"))
}

#[tokio::test]
async fn test_refused_connection_is_host_unreachable() {
    let service = service();
    let timeout = Duration::from_secs(5);

    for scheme in NETWORK_SCHEMES {
        let port = refused_port();
        let started = Instant::now();
        let result = service
            .resolve_and_probe_with_timeout(url(scheme, port), timeout)
            .await
            .unwrap();

        assert_eq!(result.status, ProbeStatus::Failed, "{scheme}");
        assert_eq!(
            result.error_kind,
            Some(ErrorKind::HostUnreachable),
            "{scheme}: {result:?}"
        );
        assert!(started.elapsed() < timeout, "{scheme} took {:?}", started.elapsed());
    }
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let service = service();
    let (_listener, port) = silent_listener().await;
    let timeout = Duration::from_millis(300);

    for scheme in NETWORK_SCHEMES {
        let started = Instant::now();
        let result = service
            .resolve_and_probe_with_timeout(url(scheme, port), timeout)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(result.error_kind, Some(ErrorKind::Timeout), "{scheme}: {result:?}");
        assert!(elapsed >= timeout, "{scheme} returned early");
        assert!(
            elapsed < timeout + Duration::from_millis(500),
            "{scheme} overran its timeout: {elapsed:?}"
        );
    }
}

#[tokio::test]
async fn test_concurrent_probes_are_independent() {
    let service = service();
    let (_listener, silent) = silent_listener().await;
    let refused = refused_port();
    let timeout = Duration::from_millis(300);

    let probes = (0..24).map(|i| {
        let service = service.clone();
        let port = if i % 2 == 0 { silent } else { refused };
        let scheme = NETWORK_SCHEMES[i % NETWORK_SCHEMES.len()];
        async move {
            let result = service
                .resolve_and_probe_with_timeout(url(scheme, port), timeout)
                .await
                .unwrap();
            (port == silent, result)
        }
    });

    for (was_silent, result) in futures::future::join_all(probes).await {
        let expected = if was_silent {
            ErrorKind::Timeout
        } else {
            ErrorKind::HostUnreachable
        };
        assert_eq!(result.error_kind, Some(expected), "{result:?}");
    }
}

#[tokio::test]
async fn test_unresolvable_host() {
    for url in [
        "postgres://u:p@nonexistent.invalid/app",
        "mysql://u:p@nonexistent.invalid/app",
        "mssql://u:p@nonexistent.invalid/app",
    ] {
        let result = service()
            .resolve_and_probe_with_timeout(ConnectionDescriptor::url(url), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.status, ProbeStatus::Failed, "{url}");
        assert_eq!(
            result.error_kind,
            Some(ErrorKind::HostUnreachable),
            "{url}: {result:?}"
        );
    }
}

#[tokio::test]
async fn test_sqlite_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);")
        .unwrap();

    let descriptor: ConnectionDescriptor =
        StructuredDescriptor::new("sqlite").filename(path.display().to_string()).into();
    let result = service().resolve_and_probe(descriptor).await.unwrap();
    assert!(result.is_success(), "{result:?}");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "Succeeded");
    assert!(json["latencyMs"].is_u64());
    assert!(json.get("errorKind").is_none());
}

#[tokio::test]
async fn test_resolution_errors_skip_probe() {
    let err = service()
        .resolve_and_probe(ConnectionDescriptor::url("oracle://scott:tiger@db/orcl"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedDialect);
}
