//! DSSAT file readers
//!
//! Each reader plugs a [`FormatStrategy`](crate::app::services::line_classifier::FormatStrategy)
//! into the shared line classifier and folds the decoded records into domain
//! types. Malformed lines are skipped rather than reported as errors.
//!
//! ## Architecture
//!
//! - [`weather`] - `.WTH` station headers and daily series
//! - [`soil`] - `.SOL` site, surface and layer blocks
//! - [`observed`] - `.xxA` observed summary data per treatment

pub mod observed;
pub mod soil;
pub mod weather;

#[cfg(test)]
pub mod tests;

pub use observed::ObservedReader;
pub use soil::SoilReader;
pub use weather::WeatherReader;

use crate::app::services::fixed_width::RawRecord;

/// File name without its extension
pub(crate) fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) if index > 0 => &file_name[..index],
        _ => file_name,
    }
}

/// Remove the placeholder columns generated for blank header titles
pub(crate) fn drop_placeholders(record: &mut RawRecord) {
    record.retain(|key, _| !key.starts_with("null"));
}

/// Titles read as fixed 6-character chunks of a header line from `start`
///
/// Blank chunks become `null<column>` placeholders.
pub(crate) fn chunk_titles(header: &str, start: usize) -> Vec<String> {
    let chars: Vec<char> = header.chars().collect();
    let mut titles = Vec::new();
    let mut index = start;
    while index < chars.len() {
        let end = (index + 6).min(chars.len());
        let title: String = chars[index..end].iter().collect::<String>().trim().to_lowercase();
        if title.is_empty() {
            titles.push(format!("null{}", index));
        } else {
            titles.push(title);
        }
        index += 6;
    }
    titles
}
