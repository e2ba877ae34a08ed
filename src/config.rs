//! Configuration management and validation.
//!
//! Provides the translator configuration: output location, worker pool size,
//! the two-digit year pivot, the scheduler's soft time budget and the DSSAT
//! releases for which batch and run files are produced. Values are layered
//! defaults → JSON config file → CLI overrides.

use crate::constants::{
    BUDGET_PER_DAILY_RECORD_MS, DEFAULT_YEAR_PIVOT, MAX_DEFAULT_WORKERS, MAX_WORKERS,
    MINIMUM_BUDGET_MS, SUPPORTED_DSSAT_VERSIONS, WORKERS_PER_CPU,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// DSSAT release targeted by batch and run files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DssatVersion {
    V45,
    V46,
}

impl DssatVersion {
    /// Release number as written in file names ("45", "46")
    pub fn number(&self) -> u32 {
        match self {
            DssatVersion::V45 => 45,
            DssatVersion::V46 => 46,
        }
    }

    /// All supported releases
    pub fn all() -> Vec<DssatVersion> {
        vec![DssatVersion::V45, DssatVersion::V46]
    }
}

impl fmt::Display for DssatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u32> for DssatVersion {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            45 => Ok(DssatVersion::V45),
            46 => Ok(DssatVersion::V46),
            other => Err(Error::configuration(format!(
                "Unsupported DSSAT version {}. Supported versions: {:?}",
                other, SUPPORTED_DSSAT_VERSIONS
            ))),
        }
    }
}

impl From<DssatVersion> for u32 {
    fn from(version: DssatVersion) -> Self {
        version.number()
    }
}

impl FromStr for DssatVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        let number = digits
            .parse::<u32>()
            .map_err(|_| Error::configuration(format!("Invalid DSSAT version '{}'", s)))?;
        DssatVersion::try_from(number)
    }
}

/// Main configuration for a translation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Directory receiving every produced file
    pub output_dir: PathBuf,

    /// Size of the bounded writer pool
    pub workers: usize,

    /// Two-digit years at or below the pivot resolve to the 2000s
    pub year_pivot: u32,

    /// Soft budget contributed by each daily weather record (milliseconds)
    pub budget_per_daily_record_ms: u64,

    /// Soft budget used when there is no daily weather (milliseconds)
    pub minimum_budget_ms: u64,

    /// Releases for which batch and run files are written
    pub dssat_versions: Vec<DssatVersion>,

    /// Show a progress bar while tasks complete
    pub show_progress: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dssat_output"),
            workers: default_workers(),
            year_pivot: DEFAULT_YEAR_PIVOT,
            budget_per_daily_record_ms: BUDGET_PER_DAILY_RECORD_MS,
            minimum_budget_ms: MINIMUM_BUDGET_MS,
            dssat_versions: DssatVersion::all(),
            show_progress: false,
        }
    }
}

/// Default pool size: a few workers per CPU, capped at the historic pool size
fn default_workers() -> usize {
    (num_cpus::get() * WORKERS_PER_CPU).clamp(1, MAX_DEFAULT_WORKERS)
}

impl TranslatorConfig {
    /// Create configuration with custom output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with a custom century pivot
    pub fn with_year_pivot(mut self, year_pivot: u32) -> Self {
        self.year_pivot = year_pivot;
        self
    }

    /// Restrict batch and run output to the given releases
    pub fn with_dssat_versions(mut self, versions: Vec<DssatVersion>) -> Self {
        self.dssat_versions = versions;
        self
    }

    /// Override the soft budget parameters
    pub fn with_budget(mut self, per_daily_record_ms: u64, minimum_ms: u64) -> Self {
        self.budget_per_daily_record_ms = per_daily_record_ms;
        self.minimum_budget_ms = minimum_ms;
        self
    }

    /// Enable the progress bar
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Soft time budget for a run over `daily_records` weather records
    pub fn soft_budget(&self, daily_records: usize) -> Duration {
        if daily_records == 0 {
            Duration::from_millis(self.minimum_budget_ms)
        } else {
            Duration::from_millis(daily_records as u64 * self.budget_per_daily_record_ms)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_WORKERS
            )));
        }

        if self.year_pivot > 99 {
            return Err(Error::configuration(format!(
                "Year pivot must be a two-digit year, got {}",
                self.year_pivot
            )));
        }

        if self.dssat_versions.is_empty() {
            return Err(Error::configuration(
                "At least one DSSAT version must be selected".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;
        let config: TranslatorConfig = serde_json::from_str(&text).map_err(|e| {
            Error::serialization(
                format!("Invalid config file '{}'", path.display()),
                e,
            )
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default config file location (`<config_dir>/dssat-translator/config.json`)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dssat-translator").join("config.json"))
            .ok_or_else(|| {
                Error::configuration("Could not determine user config directory".to_string())
            })
    }

    /// Defaults, overlaid by `explicit` or else the default config file if present
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}
