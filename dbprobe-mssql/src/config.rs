//! Mapping from [`CanonicalConfig`] to `tiberius::Config`.

use dbprobe_core::{CanonicalConfig, SslMode};
use tiberius::{AuthMethod, Config, EncryptionLevel};

use crate::error::{MssqlError, MssqlResult};

/// Application name reported to the server unless overridden by the
/// `applicationName` option.
pub const DEFAULT_APPLICATION_NAME: &str = "dbprobe";

/// Build the driver config for a probe.
pub fn to_tiberius_config(config: &CanonicalConfig) -> MssqlResult<Config> {
    let host = config
        .host
        .as_deref()
        .ok_or_else(|| MssqlError::config("host is required"))?;
    let user = config
        .user
        .as_deref()
        .ok_or_else(|| MssqlError::config("user is required for SQL Server authentication"))?;

    let mut tds = Config::new();
    tds.host(host);
    if let Some(port) = config.port {
        tds.port(port);
    }
    tds.database(&config.database);
    tds.application_name(
        config
            .option("applicationName")
            .or_else(|| config.option("application_name"))
            .unwrap_or(DEFAULT_APPLICATION_NAME),
    );
    if let Some(instance) = config.option("instanceName") {
        tds.instance_name(instance);
    }
    tds.authentication(AuthMethod::sql_server(
        user,
        config.password.as_deref().unwrap_or_default(),
    ));

    tds.encryption(encryption_level(config.ssl.mode));
    match (&config.ssl.ca_cert, trusts_any_cert(config)) {
        (_, true) => tds.trust_cert(),
        (Some(ca), false) => tds.trust_cert_ca(ca),
        (None, false) => {}
    }

    Ok(tds)
}

fn encryption_level(mode: SslMode) -> EncryptionLevel {
    match mode {
        SslMode::Disable => EncryptionLevel::NotSupported,
        SslMode::Allow | SslMode::Prefer => EncryptionLevel::Off,
        SslMode::Require | SslMode::VerifyCa | SslMode::VerifyFull => EncryptionLevel::Required,
    }
}

/// Certificates are only checked in the verify modes, and only when the
/// caller did not opt out.
fn trusts_any_cert(config: &CanonicalConfig) -> bool {
    config.ssl.trust_server_certificate || !config.ssl.mode.verifies_certificate()
}
