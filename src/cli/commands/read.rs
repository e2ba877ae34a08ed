//! Read command: DSSAT files to JSON dataset

use super::shared::{CommandSummary, setup_logging};
use crate::app::services::fixed_width::YearPivot;
use crate::app::services::translation::DssatInput;
use crate::cli::args::ReadArgs;
use crate::cli::input::{discover_input_files, load_bundle};
use crate::constants::DEFAULT_YEAR_PIVOT;
use crate::{Error, Result};
use colored::*;
use std::time::Instant;
use tracing::{debug, info};

/// Read command runner
pub async fn run_read(args: ReadArgs) -> Result<CommandSummary> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    debug!("Command line arguments: {:?}", args);
    args.validate()?;

    let year_pivot = args.year_pivot.unwrap_or(DEFAULT_YEAR_PIVOT);
    if year_pivot > 99 {
        return Err(Error::configuration(format!(
            "Year pivot must be a two-digit year, got {}",
            year_pivot
        )));
    }

    let files = discover_input_files(&args.input)?;
    let bundle = load_bundle(files).await?;
    info!("Loaded {} input files", bundle.len());

    let dataset = DssatInput::new(YearPivot::new(year_pivot)).read(&bundle);
    let json = serde_json::to_string_pretty(&dataset)?;
    tokio::fs::write(&args.output, json)
        .await
        .map_err(|e| Error::io(format!("Failed to write {}", args.output.display()), e))?;

    if !args.quiet {
        println!("\n{}", "DSSAT Read Complete".bright_green().bold());
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("   • Input files: {}", bundle.len());
        println!("   • Experiments: {}", dataset.experiments.len());
        println!("   • Soil sites: {}", dataset.soils.len());
        println!("   • Weather stations: {}", dataset.weathers.len());
        println!("   • Dataset written to {}", args.output.display().to_string().bold());
        println!();
    }

    Ok(CommandSummary {
        files_written: 1,
        failures: 0,
        elapsed: start_time.elapsed(),
    })
}
