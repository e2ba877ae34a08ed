//! Partitioning of translated records into output files
//!
//! Experiments sharing a name-derived key are written to one file per file
//! kind. Soil sites are grouped by the first two characters of their id and
//! weather stations are deduplicated by station id, with their daily series
//! merged in date order.
//!
//! ## Architecture
//!
//! - [`experiments`] - Experiment group keys and file stems
//! - [`soils`] - Soil groups and their experiment cross-references
//! - [`weather`] - Station deduplication, daily series merge and file naming
//!
//! All groupings are computed once per run, before any writer starts, so that
//! every task sees the same names.

pub mod experiments;
pub mod soils;
pub mod weather;

pub use experiments::{ExperimentGroup, group_experiments, group_key};
pub use soils::{SoilGroup, group_soils};
pub use weather::{WeatherCatalog, merge_daily, year_duration};
