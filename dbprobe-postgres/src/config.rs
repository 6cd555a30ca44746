//! Mapping from [`CanonicalConfig`] to `tokio_postgres::Config`.

use dbprobe_core::{CanonicalConfig, SslMode};
use tokio_postgres::config::SslMode as PgSslMode;

use crate::error::{PgError, PgResult};

/// User assumed when the config names none.
pub const DEFAULT_USER: &str = "postgres";

/// Application name reported to the server unless overridden by the
/// `application_name` option.
pub const DEFAULT_APPLICATION_NAME: &str = "dbprobe";

/// Build the driver config for a probe.
pub fn to_pg_config(config: &CanonicalConfig) -> PgResult<tokio_postgres::Config> {
    let host = config
        .host
        .as_deref()
        .ok_or_else(|| PgError::config("host is required"))?;

    let mut pg = tokio_postgres::Config::new();
    pg.host(host);
    if let Some(port) = config.port {
        pg.port(port);
    }
    pg.dbname(&config.database);
    pg.user(config.user.as_deref().unwrap_or(DEFAULT_USER));
    if let Some(password) = &config.password {
        pg.password(password);
    }
    pg.application_name(
        config
            .option("application_name")
            .unwrap_or(DEFAULT_APPLICATION_NAME),
    );
    if let Some(options) = config.option("options") {
        pg.options(options);
    }
    pg.ssl_mode(ssl_mode(config.ssl.mode));

    Ok(pg)
}

fn ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow | SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require | SslMode::VerifyCa | SslMode::VerifyFull => PgSslMode::Require,
    }
}
