//! dbprobe CLI - resolve connection URLs and probe database connectivity.

use clap::Parser;

use dbprobe::{DbProbeConfig, logging};
use dbprobe_cli::cli::{Cli, Command};
use dbprobe_cli::commands::{self, Context};
use dbprobe_cli::error::CliResult;
use dbprobe_cli::output;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run() -> CliResult<i32> {
    let cli = Cli::parse();

    let config = DbProbeConfig::load(cli.config.as_deref())?;
    logging::init_with(&config.logging);
    let ctx = Context::new(config)?;

    match cli.command {
        Command::Resolve(args) => commands::resolve::run(args, &ctx),
        Command::Probe(args) => commands::probe::run(args, &ctx).await,
        Command::Dialects(args) => commands::dialects::run(args, &ctx),
        Command::Version => commands::version::run(&ctx),
    }
}
