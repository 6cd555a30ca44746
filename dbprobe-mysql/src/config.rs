//! Mapping from [`CanonicalConfig`] to `mysql_async::Opts`.

use dbprobe_core::{CanonicalConfig, SslMode};
use mysql_async::{Opts, OptsBuilder, SslOpts};

use crate::error::{MysqlError, MysqlResult};

/// Build single-connection options for a probe.
///
/// `prefer_socket` is off so a host of `localhost` still goes over TCP to
/// the configured port.
pub fn to_opts(config: &CanonicalConfig) -> MysqlResult<Opts> {
    let host = config
        .host
        .as_deref()
        .ok_or_else(|| MysqlError::config("host is required"))?;

    let mut builder = OptsBuilder::default()
        .ip_or_hostname(host)
        .db_name(Some(config.database.as_str()))
        .user(config.user.as_deref())
        .pass(config.password.as_deref())
        .prefer_socket(false);

    if let Some(port) = config.port {
        builder = builder.tcp_port(port);
    }

    builder = builder.ssl_opts(ssl_opts(config));

    Ok(Opts::from(builder))
}

fn ssl_opts(config: &CanonicalConfig) -> Option<SslOpts> {
    let ssl = &config.ssl;
    if !ssl.mode.is_required() {
        return None;
    }
    let trust = ssl.trust_server_certificate;
    Some(
        SslOpts::default()
            .with_danger_accept_invalid_certs(trust || ssl.mode < SslMode::VerifyCa)
            .with_danger_skip_domain_validation(trust || ssl.mode < SslMode::VerifyFull),
    )
}
