//! Application constants for the DSSAT translator
//!
//! This module contains the default values, sentinels, layout limits and
//! file naming conventions shared by the readers, writers and scheduler.

// =============================================================================
// Missing Value Sentinels
// =============================================================================

/// Default written for an absent numeric, date or code field
pub const DEFAULT_VALUE: &str = "-99";

/// Default written for an absent free-text field that should stay blank
pub const DEFAULT_BLANK: &str = "";

/// Literal used when a crop id cannot be resolved to a crop name
pub const UNKNOWN_CROP_NAME: &str = "Unknown";

// =============================================================================
// Dates
// =============================================================================

/// Two-digit years at or below this value resolve to 2000+yy, above to 1900+yy
pub const DEFAULT_YEAR_PIVOT: u32 = 15;

/// Full date format carried by the domain model (yyyymmdd)
pub const MODEL_DATE_FORMAT: &str = "%Y%m%d";

// =============================================================================
// Layout Limits
// =============================================================================

/// Line terminator required by the simulation software
pub const LINE_ENDING: &str = "\r\n";

/// Output fields per header/data group in the observed summary (A) file
pub const SUMMARY_FIELDS_PER_LINE: usize = 40;

/// Output fields per header/data group in the time-series (T) file
pub const TIME_SERIES_FIELDS_PER_LINE: usize = 39;

/// Longest observed variable name that fits a 6-character column
pub const MAX_OBSERVED_NAME_LEN: usize = 5;

/// Wrap width for experiment notes without embedded line breaks
pub const NOTES_WRAP_WIDTH: usize = 75;

/// Longest soil id accepted by the soil and experiment layouts
pub const MAX_SOIL_ID_LEN: usize = 10;

// =============================================================================
// File Naming
// =============================================================================

/// File-kind tags used by the input bundle
pub mod file_kinds {
    pub const WEATHER: &str = "W";
    pub const SOIL: &str = "S";
    pub const OBSERVED: &str = "A";
}

/// File extensions recognised by input discovery
pub const WEATHER_EXTENSION: &str = "WTH";
pub const SOIL_EXTENSION: &str = "SOL";

/// Soil file name used when a soil group has no id prefix
pub const FALLBACK_SOIL_FILE: &str = "soil.SOL";

/// Cultivar file name used for experiments without a conforming name
pub const FALLBACK_CULTIVAR_FILE: &str = "Cultivar.CUL";

/// Prefix for generated experiment file stems
pub const TEMP_STEM_PREFIX: &str = "TEMP";

/// First generated institute code for unnamed weather stations
pub const FIRST_GENERATED_INSI: u32 = 0xAAAA;

/// Climate id assigned when none can be derived from a file name
pub const UNKNOWN_CLIMATE_ID: &str = "0XXX";

/// Crop placeholder in generated file names
pub const UNKNOWN_CROP_ID: &str = "XX";

// =============================================================================
// Scheduling Defaults
// =============================================================================

/// Upper bound on the default worker count
pub const MAX_DEFAULT_WORKERS: usize = 64;

/// Default workers per available CPU
pub const WORKERS_PER_CPU: usize = 8;

/// Hard limit accepted by configuration validation
pub const MAX_WORKERS: usize = 256;

/// Soft budget contribution of each daily weather record
pub const BUDGET_PER_DAILY_RECORD_MS: u64 = 10;

/// Soft budget used when the dataset has no daily weather
pub const MINIMUM_BUDGET_MS: u64 = 10_000;

/// Supported DSSAT release numbers for batch and run files
pub const SUPPORTED_DSSAT_VERSIONS: &[u32] = &[45, 46];
