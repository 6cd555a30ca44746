//! `dbprobe version` command - Display version information.

use crate::commands::Context;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Package name
const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the version command
pub fn run(ctx: &Context) -> CliResult<i32> {
    output::header("dbprobe");

    kv(
        "Version",
        dbprobe::version::version_string(ctx.config.version.file.as_deref()),
    );
    kv("Binary", NAME);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";
    kv("Build", build_mode);

    let drivers: Vec<_> = ctx
        .service
        .prober()
        .drivers()
        .iter()
        .map(|d| d.name())
        .collect();
    kv(
        "Drivers",
        &if drivers.is_empty() {
            "none".to_string()
        } else {
            drivers.join(", ")
        },
    );

    output::newline();
    output::dim(&format!(
        "Probe timeout {:?} (max {:?})",
        ctx.service.prober().settings().default_timeout,
        ctx.service.prober().settings().max_timeout
    ));
    Ok(0)
}
