//! Translate command: JSON dataset to DSSAT files

use super::shared::{CommandSummary, create_progress_bar, load_configuration, setup_logging};
use crate::app::models::Dataset;
use crate::app::services::scheduler::TranslationReport;
use crate::app::services::translation::OutputController;
use crate::cli::args::{OutputFormat, TranslateArgs};
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Translate command runner
///
/// 1. Set up logging and configuration
/// 2. Load the JSON dataset
/// 3. Write every DSSAT file through the output controller
/// 4. Report the produced files
pub async fn run_translate(
    args: TranslateArgs,
    cancellation: CancellationToken,
) -> Result<CommandSummary> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting DSSAT translation");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let dataset = load_dataset(&args.input).await?;
    info!(
        "Loaded {} experiments, {} soils and {} weather stations from {}",
        dataset.experiments.len(),
        dataset.soils.len(),
        dataset.weathers.len(),
        args.input.display()
    );

    let mut controller = OutputController::new(config.clone()).with_cancellation(cancellation);
    if config.show_progress {
        controller = controller.with_progress(create_progress_bar("Writing DSSAT files"));
    }
    let report = controller.write(&dataset, &config.output_dir).await?;

    if report.cancelled {
        return Err(Error::processing_interrupted(
            "Translation cancelled by user".to_string(),
        ));
    }

    let summary = CommandSummary {
        files_written: report.files.len(),
        failures: report.failed.len(),
        elapsed: start_time.elapsed(),
    };

    match args.output_format {
        OutputFormat::Human => print_human_report(&report, &summary, &config.output_dir),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(summary)
}

/// Read and deserialize the dataset JSON
async fn load_dataset(path: &Path) -> Result<Dataset> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read dataset {}", path.display()), e))?;
    serde_json::from_str(&text)
        .map_err(|e| Error::serialization(format!("Invalid dataset {}", path.display()), e))
}

fn print_human_report(report: &TranslationReport, summary: &CommandSummary, output_dir: &Path) {
    println!("\n{}", "DSSAT Translation Complete".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Output directory: {}", output_dir.display());
    println!(
        "   • Files written: {}",
        report.files.len().to_string().bright_white().bold()
    );
    println!("   • Tasks with nothing to write: {}", report.empty);
    println!("   • Processing time: {}", HumanDuration(summary.elapsed));

    if report.has_failures() {
        warn!("{} writer tasks failed", report.failed.len());
        println!(
            "   • Failed tasks: {}",
            report.failed.len().to_string().bright_red().bold()
        );
        for label in &report.failed {
            println!("       {}", label.red());
        }
    }

    if !report.files.is_empty() {
        println!("\n{}", "Output Files:".bold());
        for file in &report.files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            println!("   • {}", name);
        }
    }
    println!();
}
