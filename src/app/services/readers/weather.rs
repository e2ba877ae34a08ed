//! Weather (`.WTH`) reader

use super::{chunk_titles, drop_placeholders, file_stem};
use crate::app::models::{FieldsExt, Weather};
use crate::app::services::fixed_width::dates::from_doy;
use crate::app::services::fixed_width::{FormatSpec, YearPivot};
use crate::app::services::grouping::merge_daily;
use crate::app::services::line_classifier::{
    ClassifiedLine, FormatStrategy, LineClassifier, SectionMarker, leading_column,
};
use crate::constants::UNKNOWN_CLIMATE_ID;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static NOTES_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\*weather\s*(data\s*)*:?").expect("valid weather notes pattern")
});

static OLD_STYLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w{4}\d{4}$").expect("valid weather file name pattern"));

/// Station header column → (model field, width)
fn station_column(name: &str) -> Option<(&'static str, usize)> {
    match name {
        "insi" => Some(("dssat_insi", 6)),
        "lat" => Some(("wst_lat", 9)),
        "long" => Some(("wst_long", 9)),
        "elev" => Some(("wst_elev", 6)),
        "tav" => Some(("tav", 6)),
        "amp" => Some(("tamp", 6)),
        "refht" => Some(("refht", 6)),
        "wndht" => Some(("wndht", 6)),
        "co2" | "cco2" => Some(("co2y", 6)),
        _ => None,
    }
}

/// Daily header title → model field
fn daily_title(title: String) -> String {
    match title.as_str() {
        "dewp" => "tdew".to_string(),
        "par" => "pard".to_string(),
        "vprs" => "vprsd".to_string(),
        "rhum" => "rhumd".to_string(),
        _ => title,
    }
}

struct WeatherFormat;

impl FormatStrategy for WeatherFormat {
    fn classify_section(&self, _line: &str) -> SectionMarker {
        SectionMarker::new("weather")
    }

    fn header_layout(&self, _section: &str, label: &str, header_line: &str) -> Option<FormatSpec> {
        match leading_column(label) {
            Some("insi") => {
                let mut spec = FormatSpec::new();
                for (name, width) in FormatSpec::from_header(header_line).fields() {
                    match station_column(name) {
                        Some((field, fixed)) => spec.push(field, fixed),
                        None => spec.push(name.clone(), *width),
                    }
                }
                Some(spec)
            }
            Some("date") => {
                let mut spec = FormatSpec::new().with("w_date", 5);
                for title in chunk_titles(header_line, 6) {
                    spec.push(daily_title(title), 6);
                }
                Some(spec)
            }
            _ => None,
        }
    }
}

/// Station id and climate id derived from a weather file stem
fn station_identity(stem: &str) -> (String, String) {
    if stem.chars().count() == 8 && !OLD_STYLE_NAME.is_match(stem) {
        (stem.to_string(), stem.chars().skip(4).collect())
    } else {
        (stem.chars().take(4).collect(), UNKNOWN_CLIMATE_ID.to_string())
    }
}

/// Reads weather files into stations
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherReader {
    pivot: YearPivot,
}

impl WeatherReader {
    pub fn new(pivot: YearPivot) -> Self {
        Self { pivot }
    }

    /// Read one weather file
    pub fn read_file(&self, file_name: &str, text: &str) -> Weather {
        let stem = file_stem(file_name);
        let (mut wst_id, mut clim_id) = station_identity(stem);
        let mut weather = Weather::default();
        let mut classifier = LineClassifier::new(WeatherFormat);

        for line in text.lines() {
            match classifier.classify(line) {
                ClassifiedLine::Section { .. } => {
                    let notes = NOTES_PREFIX.replace(line, "");
                    weather
                        .fields
                        .insert("wst_notes".to_string(), notes.trim().to_string());
                }
                ClassifiedLine::Data {
                    label, mut record, ..
                } => match leading_column(&label) {
                    Some("insi") => {
                        drop_placeholders(&mut record);
                        weather.fields.extend(record);
                        match weather.fields.value("dssat_insi") {
                            Some(insi) if wst_id.starts_with(insi) => {}
                            insi => warn!(
                                "The name of weather file [{}] does not match with the INSI ({}) in the file",
                                file_name,
                                insi.unwrap_or("none")
                            ),
                        }
                    }
                    Some("date") => {
                        drop_placeholders(&mut record);
                        if let Some(date) = record.get("w_date").and_then(|d| from_doy(d, self.pivot)) {
                            record.insert("w_date".to_string(), date);
                        }
                        weather.daily.push(record);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Old-standard names carry the two-digit start year after the institute code
        if wst_id.chars().count() == 4 {
            if let Some(first) = weather.daily.first().and_then(|d| d.value("w_date")) {
                if first.len() > 3 {
                    let year: u32 = first.get(2..4).and_then(|y| y.parse().ok()).unwrap_or(80);
                    if !stem.starts_with(&format!("{}{:02}", wst_id, year)) {
                        wst_id = stem.to_string();
                        clim_id = stem.chars().skip(4).collect();
                    }
                }
            }
        }

        for (key, value) in [
            ("wst_name", wst_id.as_str()),
            ("wst_id", wst_id.as_str()),
            ("clim_id", clim_id.as_str()),
            ("wst_source", "DSSAT"),
        ] {
            weather.fields.insert(key.to_string(), value.to_string());
        }

        debug!(
            "Read weather station {} with {} daily records from {}",
            wst_id,
            weather.daily.len(),
            file_name
        );
        weather
    }

    /// Read all weather files, merging stations that share an id
    ///
    /// The first file read for an id keeps its station fields; later files
    /// only contribute daily records.
    pub fn read_all<'a, I>(&self, files: I) -> Vec<Weather>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut stations: Vec<Weather> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();

        for (file_name, text) in files {
            let weather = self.read_file(file_name, text);
            let id = weather.station_id().to_string();
            match index_of.get(&id) {
                Some(&index) => merge_daily(&mut stations[index].daily, weather.daily),
                None => {
                    index_of.insert(id, stations.len());
                    stations.push(weather);
                }
            }
        }
        stations
    }
}
