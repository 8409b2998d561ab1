//! Command implementations for the CTD processor CLI
//!
//! Each pipeline stage has its own module; `run` chains all three.

pub mod aggregate;
pub mod derive;
pub mod extract;
pub mod run;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Context;
use tracing::debug;

/// Main command runner for the CTD processor
///
/// Sets up logging and configuration once, then dispatches to the
/// subcommand handler. Without a subcommand there is nothing to do.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let Some(command) = args.command else {
        return Ok(());
    };

    shared::setup_logging(&args.global)?;
    debug!("Command line arguments: {:?}", command);

    let config =
        shared::load_configuration(&args.global).context("Failed to load configuration")?;
    let format = args.global.output_format;

    match command {
        Commands::Extract(extract_args) => {
            extract::run_extract(&extract_args, config, format).await
        }
        Commands::Aggregate(aggregate_args) => {
            aggregate::run_aggregate(&aggregate_args, config, format).await
        }
        Commands::Derive(derive_args) => derive::run_derive(&derive_args, config, format).await,
        Commands::Run(run_args) => run::run_pipeline(&run_args, config, format).await,
    }
}
