//! `dbprobe probe` command - Run one bounded connectivity probe.

use std::path::Path;
use std::time::Duration;

use dbprobe::{ConnectionDescriptor, ProbeResult};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::EXIT_PROBE_FAILED;
use crate::cli::{OutputFormat, ProbeArgs};
use crate::commands::Context;
use crate::error::{CliError, CliResult};
use crate::output::{self, kv};

/// Run the probe command
pub async fn run(args: ProbeArgs, ctx: &Context) -> CliResult<i32> {
    let descriptor = match (&args.url, &args.descriptor) {
        (Some(url), _) => ConnectionDescriptor::url(url.as_str()),
        (None, Some(path)) => read_descriptor(path).await?,
        (None, None) => return Err(CliError::descriptor("a URL or --descriptor is required")),
    };

    let timeout = Duration::from_millis(args.timeout_ms.unwrap_or(0));
    let result = ctx
        .service
        .resolve_and_probe_with_timeout(descriptor, timeout)
        .await?;

    match args.format {
        OutputFormat::Json => output::json(&result)?,
        OutputFormat::Pretty => print_result(&result),
    }

    Ok(if result.is_success() {
        0
    } else {
        EXIT_PROBE_FAILED
    })
}

async fn read_descriptor(path: &Path) -> CliResult<ConnectionDescriptor> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path).await?
    };
    debug!(path = %path.display(), bytes = content.len(), "Descriptor read");

    serde_json::from_str(&content).map_err(|e| CliError::descriptor(e.to_string()))
}

fn print_result(result: &ProbeResult) {
    let latency = format!("{} ms", result.latency_ms());
    match (&result.error_kind, &result.message) {
        (None, _) => output::success(&format!("Connection succeeded in {latency}")),
        (Some(kind), message) => {
            output::failure(&format!("{} after {latency}", kind.description()));
            kv("Kind", kind.as_str());
            if let Some(message) = message {
                kv("Message", message);
            }
        }
    }
}
