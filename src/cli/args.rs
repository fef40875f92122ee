use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate local stub packages for the third-party dependencies of an ArkTS module.
#[derive(Parser, Debug)]
#[command(
    name = "arkstub",
    version,
    about = "Stub declarations for unavailable ArkTS dependencies"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a module and write stub packages next to it
    Generate {
        /// Module root (the directory holding oh-package.json5)
        module: PathBuf,

        /// Analyze only, write nothing
        #[arg(long)]
        dry_run: bool,

        /// Print the JSON report instead of a summary
        #[arg(long)]
        json: bool,

        /// Configuration file (default: <MODULE>/arkstub.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also generate stubs for SDK modules (@kit., @ohos., @hms.)
        #[arg(long)]
        include_sdk: bool,
    },

    /// Analyze a module and print the inferred dependency model
    Scan {
        /// Module root
        module: PathBuf,

        /// Print the JSON report instead of a summary
        #[arg(long)]
        json: bool,

        /// Configuration file (default: <MODULE>/arkstub.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
