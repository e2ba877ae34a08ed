//! DSSAT file writers
//!
//! Every writer renders one output artifact into memory and returns it as a
//! [`RenderedFile`], or `None` when there is nothing to write for its input.
//! Rendering never fails: per-record problems are collected in a
//! [`WarningLog`](crate::app::services::fixed_width::WarningLog) and written as
//! `!` comment lines at the top of the file. Only the final write to disk can
//! fail, through [`write_rendered`].
//!
//! ## Architecture
//!
//! - [`experiment`] - `.xxX` experiment files with factor levels
//! - [`observed`] - `.xxA` observed summary files
//! - [`time_series`] - `.xxT` observed time series files
//! - [`cultivar`] - `.CUL` cultivar coefficient files
//! - [`soil`] - `.SOL` soil files, one per soil group
//! - [`weather`] - `.WTH` station files
//! - [`batch`] - `DSSBatch.vNN` and `RunNN.bat` launch files
//!
//! All writers use `\r\n` line endings.

pub mod batch;
pub mod cultivar;
pub mod experiment;
pub mod observed;
pub mod soil;
pub mod time_series;
pub mod weather;

#[cfg(test)]
pub mod tests;

pub use batch::{render_batch_file, render_run_file};
pub use cultivar::render_cultivar_file;
pub use experiment::render_experiment_file;
pub use observed::render_observed_file;
pub use soil::render_soil_file;
pub use time_series::render_time_series_file;
pub use weather::render_weather_file;

use crate::app::services::fixed_width::YearPivot;
use crate::app::services::grouping::WeatherCatalog;
use crate::app::services::lookup::CropCodes;
use crate::constants::LINE_ENDING;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output file rendered in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// File name relative to the output directory
    pub name: String,
    pub content: String,
}

impl RenderedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Write `file` into `dir`, returning its path
pub fn write_rendered(dir: &Path, file: &RenderedFile) -> Result<PathBuf> {
    let path = dir.join(&file.name);
    std::fs::write(&path, file.content.as_bytes())
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
    Ok(path)
}

/// Read-only state shared by every writer task of one run
#[derive(Debug, Clone)]
pub struct WriterContext {
    pub crops: Arc<CropCodes>,
    pub weather: Arc<WeatherCatalog>,
    pub pivot: YearPivot,

    /// Timestamp printed in generated file headers
    pub generated_at: String,
}

impl WriterContext {
    pub fn new(crops: Arc<CropCodes>, weather: Arc<WeatherCatalog>, pivot: YearPivot) -> Self {
        Self {
            crops,
            weather,
            pivot,
            generated_at: chrono::Local::now()
                .format("%a %b %d %H:%M:%S %Y")
                .to_string(),
        }
    }

    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }
}

/// Append `line` followed by the DSSAT line terminator
pub(crate) fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push_str(LINE_ENDING);
}
