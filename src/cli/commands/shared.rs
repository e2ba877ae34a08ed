//! Shared components for CLI commands

use crate::cli::args::TranslateArgs;
use crate::config::TranslatorConfig;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of one command for the final report
#[derive(Debug, Clone, Default)]
pub struct CommandSummary {
    /// Files written by the command
    pub files_written: usize,
    /// Writer tasks that failed
    pub failures: usize,
    pub elapsed: Duration,
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` overrides the level derived from the verbosity flags.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dssat_translator={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration: defaults, then the config file, then CLI overrides
pub fn load_configuration(args: &TranslateArgs) -> Result<TranslatorConfig> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No explicit config file, checking the default location"),
    }

    let mut config = TranslatorConfig::load_layered(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut TranslatorConfig, args: &TranslateArgs) {
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(year_pivot) = args.year_pivot {
        config.year_pivot = year_pivot;
    }
    if !args.dssat_versions.is_empty() {
        let mut versions = args.dssat_versions.clone();
        versions.sort();
        versions.dedup();
        config.dssat_versions = versions;
    }
    config.show_progress = args.show_progress();
}

/// Progress bar whose length grows as tasks are submitted
pub fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Args, Commands};
    use crate::config::DssatVersion;
    use clap::Parser;
    use std::path::PathBuf;

    fn translate_args(extra: &[&str]) -> TranslateArgs {
        let mut argv = vec!["dssat_translator", "translate", "-i", "dataset.json"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Some(Commands::Translate(args)) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides() {
        let args = translate_args(&[
            "-o",
            "out",
            "-j",
            "3",
            "--year-pivot",
            "20",
            "--dssat-version",
            "46",
            "--dssat-version",
            "46",
        ]);
        let mut config = TranslatorConfig::default();
        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.year_pivot, 20);
        assert_eq!(config.dssat_versions, vec![DssatVersion::V46]);
        assert!(config.show_progress);
    }

    #[test]
    fn test_defaults_kept_without_overrides() {
        let args = translate_args(&["-q"]);
        let mut config = TranslatorConfig::default();
        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.output_dir, TranslatorConfig::default().output_dir);
        assert_eq!(config.dssat_versions, DssatVersion::all());
        assert!(!config.show_progress);
    }

    #[test]
    fn test_progress_bar_starts_empty() {
        let pb = create_progress_bar("Writing");
        assert_eq!(pb.length(), Some(0));
    }
}
