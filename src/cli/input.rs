//! Input discovery for the read command
//!
//! Walks a directory for DSSAT weather, soil and observed summary files and
//! loads them into an [`InputBundle`].

use crate::app::services::translation::InputBundle;
use crate::constants::{SOIL_EXTENSION, WEATHER_EXTENSION, file_kinds};
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Files read concurrently while loading a bundle
const CONCURRENT_READS: usize = 8;

/// Input kind tag of `path` from its extension, if it is a supported file
///
/// `.WTH` is weather, `.SOL` is soil and any three-letter extension ending in
/// `A` (`.MZA`, `.WHA`, ...) is an observed summary. Case is ignored.
pub fn classify_file(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_uppercase();
    if extension == WEATHER_EXTENSION {
        Some(file_kinds::WEATHER)
    } else if extension == SOIL_EXTENSION {
        Some(file_kinds::SOIL)
    } else if extension.len() == 3
        && extension.ends_with('A')
        && extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        Some(file_kinds::OBSERVED)
    } else {
        None
    }
}

/// Recursively find supported input files under `dir`, sorted by path
///
/// A directory without any supported file is a data validation error.
pub fn discover_input_files(dir: &Path) -> Result<Vec<(&'static str, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to walk {}", dir.display()), e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(kind) = classify_file(entry.path()) {
            files.push((kind, entry.into_path()));
        }
    }
    if files.is_empty() {
        return Err(Error::data_validation(format!(
            "No DSSAT weather, soil or observed files found in {}",
            dir.display()
        )));
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));

    debug!("Discovered {} input files in {}", files.len(), dir.display());
    Ok(files)
}

/// Read `files` into a bundle keyed by kind and file name
///
/// Non-UTF-8 bytes are replaced rather than rejected.
pub async fn load_bundle(files: Vec<(&'static str, PathBuf)>) -> Result<InputBundle> {
    let loaded: Vec<Result<(&'static str, String, String)>> = stream::iter(files)
        .map(|(kind, path)| async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok::<_, Error>((kind, name, String::from_utf8_lossy(&bytes).into_owned()))
        })
        .buffer_unordered(CONCURRENT_READS)
        .collect()
        .await;

    let mut bundle = InputBundle::new();
    for result in loaded {
        let (kind, name, text) = result?;
        bundle.insert(kind, name, text);
    }
    Ok(bundle)
}
