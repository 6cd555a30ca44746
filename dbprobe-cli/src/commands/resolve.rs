//! `dbprobe resolve` command - Translate a URL without connecting.

use dbprobe::CanonicalConfig;

use crate::cli::{OutputFormat, ResolveArgs};
use crate::commands::Context;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the resolve command
pub fn run(args: ResolveArgs, ctx: &Context) -> CliResult<i32> {
    let config = ctx.service.resolve_only(&args.url)?;

    match args.format {
        OutputFormat::Json => output::json(&config)?,
        OutputFormat::Pretty => print_config(&config),
    }
    Ok(0)
}

/// Print a canonical config with the password masked.
pub fn print_config(config: &CanonicalConfig) {
    output::header("Resolved connection");
    kv("Dialect", &config.dialect);
    kv("Driver", config.driver.name());
    kv("Host", &output::or_dash(config.host.as_deref()));
    kv("Port", &output::or_dash(config.port));
    kv("User", &output::or_dash(config.user.as_deref()));
    kv("Password", output::masked(config.password.as_deref()));
    kv("Database", &config.database);
    kv("SSL", config.ssl.mode.as_str());
    kv(
        "Pool",
        &format!("min {} / max {}", config.pool.min, config.pool.max),
    );
    if !config.options.is_empty() {
        output::section("  Options");
        for (key, value) in &config.options {
            output::list_item(&format!("{key} = {value}"));
        }
    }
    output::newline();
}
