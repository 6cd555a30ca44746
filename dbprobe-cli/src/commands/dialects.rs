//! `dbprobe dialects` command - List supported dialects.

use crate::cli::{DialectsArgs, OutputFormat};
use crate::commands::Context;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the dialects command
pub fn run(args: DialectsArgs, ctx: &Context) -> CliResult<i32> {
    let registry = ctx.service.registry();
    let prober = ctx.service.prober();

    if args.format == OutputFormat::Json {
        output::json(registry.profiles())?;
        return Ok(0);
    }

    output::header("Supported dialects");
    for profile in registry.profiles() {
        output::newline();
        output::section(&format!("{} ({})", profile.name, profile.label));
        kv("Aliases", &profile.url_scheme_aliases.join(", "));
        kv("Port", &output::or_dash(profile.default_port));
        kv(
            "Driver",
            &if prober.supports(profile.driver_id) {
                profile.driver_id.name().to_string()
            } else {
                format!("{} (not compiled in)", profile.driver_id.name())
            },
        );
    }
    output::newline();
    Ok(0)
}
