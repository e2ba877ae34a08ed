//! Command implementations for the DSSAT translator CLI
//!
//! Each command is implemented in its own module:
//! - `translate`: JSON dataset to DSSAT files
//! - `read`: DSSAT files to JSON dataset

pub mod read;
pub mod shared;
pub mod translate;

pub use shared::CommandSummary;

use crate::cli::args::Commands;
use anyhow::Context;
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand handler
pub async fn run(command: Commands, cancellation: CancellationToken) -> anyhow::Result<CommandSummary> {
    match command {
        Commands::Translate(args) => {
            let input = args.input.clone();
            translate::run_translate(args, cancellation)
                .await
                .with_context(|| format!("Failed to translate {}", input.display()))
        }
        Commands::Read(args) => {
            let input = args.input.clone();
            read::run_read(args)
                .await
                .with_context(|| format!("Failed to read DSSAT files from {}", input.display()))
        }
    }
}
