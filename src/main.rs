use anyhow::Result;
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use arkstub::cli::{run_generate, run_scan, Args, Command};

fn init_tracing(verbose: bool) {
    let default = if verbose { "arkstub=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Generate {
            module,
            dry_run,
            json,
            config,
            include_sdk,
        } => run_generate(&module, dry_run, json, config.as_deref(), include_sdk),
        Command::Scan {
            module,
            json,
            config,
        } => run_scan(&module, json, config.as_deref()),
    }
}
