use clap::Parser;
use dssat_translator::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl-C cancels outstanding writer tasks; the command reports the interruption
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                signal_token.cancel();
            }
        });

        commands::run(command, cancellation_token).await
    });

    match result {
        Ok(summary) => {
            if summary.failures > 0 {
                process::exit(2);
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("DSSAT Translator - agronomic datasets to and from DSSAT files");
    println!("=============================================================");
    println!();
    println!("USAGE:");
    println!("    dssat_translator <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    translate   Write DSSAT files for a JSON dataset");
    println!("    read        Read DSSAT weather, soil and observed files into a JSON dataset");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    dssat_translator translate --input dataset.json --output out/");
    println!("    dssat_translator translate -i dataset.json --dssat-version 46 -j 8");
    println!("    dssat_translator read --input dssat_files/ --output dataset.json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    dssat_translator <COMMAND> --help");
}
