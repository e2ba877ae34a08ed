//! Command-line argument definitions for the DSSAT translator
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::config::DssatVersion;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the DSSAT translator
///
/// Translates between the JSON dataset model and the fixed-width text files
/// read by the DSSAT crop simulation model.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dssat_translator",
    version,
    about = "Translate agronomic datasets to and from DSSAT fixed-width files",
    long_about = "Writes experiment, observed, cultivar, soil, weather and batch files for the \
                  DSSAT crop simulation model from a JSON dataset, and reads DSSAT weather, soil \
                  and observed summary files back into the same JSON model."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Write DSSAT files for a JSON dataset
    Translate(TranslateArgs),
    /// Read DSSAT files from a directory into a JSON dataset
    Read(ReadArgs),
}

/// Arguments for the translate command
#[derive(Debug, Clone, Parser)]
pub struct TranslateArgs {
    /// JSON dataset to translate
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "JSON dataset to translate"
    )]
    pub input: PathBuf,

    /// Directory receiving the DSSAT files
    ///
    /// Created if it doesn't exist. Defaults to the configured output
    /// directory (./dssat_output).
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory receiving the DSSAT files"
    )]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// JSON configuration file. If not specified, looks for
    /// <config dir>/dssat-translator/config.json
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of concurrent writer tasks
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of concurrent writer tasks"
    )]
    pub workers: Option<usize>,

    /// DSSAT releases for batch and run files (repeatable)
    #[arg(
        long = "dssat-version",
        value_name = "VERSION",
        help = "DSSAT release for batch and run files (45 or 46, repeatable)"
    )]
    pub dssat_versions: Vec<DssatVersion>,

    /// Two-digit years at or below this value resolve to the 2000s
    #[arg(long = "year-pivot", value_name = "YY", help = "Century pivot for two-digit years")]
    pub year_pivot: Option<u32>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the read command
#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
    /// Directory searched recursively for .WTH, .SOL and .??A files
    #[arg(
        short = 'i',
        long = "input",
        value_name = "DIR",
        help = "Directory containing DSSAT files"
    )]
    pub input: PathBuf,

    /// JSON dataset to write
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "JSON dataset to write"
    )]
    pub output: PathBuf,

    /// Two-digit years at or below this value resolve to the 2000s
    #[arg(long = "year-pivot", value_name = "YY", help = "Century pivot for two-digit years")]
    pub year_pivot: Option<u32>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Log level for the verbosity flags
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl TranslateArgs {
    /// Validate the translate command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "Input dataset does not exist: {}",
                self.input.display()
            )));
        }

        if self.workers == Some(0) {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Progress bars are hidden in quiet mode and for machine-readable output
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl ReadArgs {
    /// Validate the read command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                self.input.display()
            )));
        }

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(Error::configuration(format!(
                    "Output file directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_translate_arguments() {
        let args = Args::try_parse_from([
            "dssat_translator",
            "translate",
            "-i",
            "dataset.json",
            "-o",
            "out",
            "--dssat-version",
            "45",
            "--dssat-version",
            "v46",
            "-j",
            "4",
            "-vv",
        ])
        .unwrap();

        let Some(Commands::Translate(translate)) = args.command else {
            panic!("expected translate command");
        };
        assert_eq!(translate.input, PathBuf::from("dataset.json"));
        assert_eq!(translate.output, Some(PathBuf::from("out")));
        assert_eq!(
            translate.dssat_versions,
            vec![DssatVersion::V45, DssatVersion::V46]
        );
        assert_eq!(translate.workers, Some(4));
        assert_eq!(translate.get_log_level(), "debug");
        assert!(translate.show_progress());
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = Args::try_parse_from([
            "dssat_translator",
            "translate",
            "-i",
            "dataset.json",
            "--dssat-version",
            "47",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from([
            "dssat_translator",
            "read",
            "-i",
            "in",
            "-o",
            "out.json",
            "-q",
            "-v",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_validation() {
        let dir = TempDir::new().unwrap();
        let args = ReadArgs {
            input: dir.path().to_path_buf(),
            output: dir.path().join("dataset.json"),
            year_pivot: None,
            verbose: 0,
            quiet: true,
        };
        assert!(args.validate().is_ok());
        assert_eq!(args.get_log_level(), "error");

        let missing = ReadArgs {
            input: dir.path().join("missing"),
            ..args.clone()
        };
        assert!(missing.validate().is_err());

        let orphan = ReadArgs {
            output: dir.path().join("missing").join("dataset.json"),
            ..args
        };
        assert!(orphan.validate().is_err());
    }

    #[test]
    fn test_translate_validation() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dataset.json");
        std::fs::write(&input, "{}").unwrap();

        let args = Args::try_parse_from([
            "dssat_translator",
            "translate",
            "-i",
            input.to_str().unwrap(),
            "--output-format",
            "json",
        ])
        .unwrap();
        let Some(Commands::Translate(translate)) = args.command else {
            panic!("expected translate command");
        };
        assert!(translate.validate().is_ok());
        assert!(!translate.show_progress());

        let zero_workers = TranslateArgs {
            workers: Some(0),
            ..translate.clone()
        };
        assert!(zero_workers.validate().is_err());

        let missing = TranslateArgs {
            input: dir.path().join("none.json"),
            ..translate
        };
        assert!(missing.validate().is_err());
    }
}
