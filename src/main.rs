use clap::Parser;
use ctd_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // A failed handler install must not abort the run, so it waits forever instead
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CTD Processor - WOCE Exchange Station Pipeline");
    println!("==============================================");
    println!();
    println!("Extract CTD station files from zip archives, aggregate them by latitude");
    println!("and derive depth, absolute salinity, conservative temperature and sound speed.");
    println!();
    println!("USAGE:");
    println!("    ctd_processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    extract     Extract station files into one processed table per archive");
    println!("    aggregate   Merge processed tables into one record per latitude");
    println!("    derive      Derive seawater properties from aggregated records");
    println!("    run         Run all three stages in sequence");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    ctd_processor run --input zip_files");
    println!("    ctd_processor extract -i zip_files -o processed_data");
    println!("    ctd_processor aggregate -i processed_data -o aggregated.csv");
    println!("    ctd_processor derive -i aggregated.csv -o derived.csv --failures failed.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ctd_processor <COMMAND> --help");
}
