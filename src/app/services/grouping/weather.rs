//! Weather station deduplication, daily series merge and file naming

use crate::app::models::{Dataset, Fields, FieldsExt, Weather};
use crate::app::services::fixed_width::YearPivot;
use crate::constants::{FIRST_GENERATED_INSI, UNKNOWN_CLIMATE_ID};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

static INSI_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w{4}|\w{8})$").expect("valid institute code pattern"));

fn daily_date(record: &Fields) -> Option<u64> {
    record.value("w_date").and_then(|d| d.parse().ok())
}

/// Splice `incoming` into `existing` keeping ascending date order
///
/// The incoming series is inserted before the first existing record dated
/// after its first record, or appended when there is none. An incoming series
/// whose first date cannot be read is appended as is. Merging an empty series
/// changes nothing.
pub fn merge_daily(existing: &mut Vec<Fields>, incoming: Vec<Fields>) {
    if incoming.is_empty() {
        return;
    }
    if existing.is_empty() {
        *existing = incoming;
        return;
    }

    let Some(first) = daily_date(&incoming[0]) else {
        existing.extend(incoming);
        return;
    };

    let position = existing
        .iter()
        .position(|record| daily_date(record).is_some_and(|date| date > first))
        .unwrap_or(existing.len());
    existing.splice(position..position, incoming);
}

/// Two-digit start year plus two-digit duration in years, e.g. `8203`
///
/// Empty when the station has no daily data. The duration is capped at 99 and
/// falls back to `01` when the years cannot be read.
pub fn year_duration(weather: &Weather, pivot: YearPivot) -> String {
    let (Some(first), Some(last)) = (weather.daily.first(), weather.daily.last()) else {
        return String::new();
    };
    let year_of = |record: &Fields| -> String {
        let date = record.value_or("w_date", "");
        date.chars().skip(2).take(2).collect::<String>().trim().to_string()
    };
    let start = year_of(first);
    let end = year_of(last);
    if start.is_empty() || end.is_empty() {
        return String::new();
    }

    let duration = match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(s), Ok(e)) => {
            let years = pivot.resolve(e) - pivot.resolve(s) + 1;
            format!("{:02}", years.min(99))
        }
        _ => "01".to_string(),
    };
    format!("{}{}", start, duration)
}

/// Deduplicated weather stations with their output file names
///
/// Built once per run so that the weather writer and every experiment file
/// agree on the station file names.
#[derive(Debug, Clone, Default)]
pub struct WeatherCatalog {
    stations: Vec<(String, Weather)>,
    by_id: HashMap<String, String>,
}

impl WeatherCatalog {
    /// Collect the stations linked to experiments followed by standalone ones
    ///
    /// Stations sharing a non-empty id are merged into the first occurrence.
    pub fn build(dataset: &Dataset, pivot: YearPivot) -> Self {
        let mut stations: Vec<Weather> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();

        let all = dataset
            .experiments
            .iter()
            .filter_map(|e| e.weather.as_ref())
            .chain(dataset.weathers.iter());

        for weather in all {
            let id = weather.station_id();
            if id.is_empty() {
                stations.push(weather.clone());
                continue;
            }
            match index_of.get(id) {
                Some(&index) => {
                    if stations[index] != *weather {
                        merge_daily(&mut stations[index].daily, weather.daily.clone());
                    }
                }
                None => {
                    index_of.insert(id.to_string(), stations.len());
                    stations.push(weather.clone());
                }
            }
        }

        let mut namer = StationNamer::new(pivot);
        for weather in &stations {
            namer.reserve(weather.station_id());
        }
        let mut by_id = HashMap::new();
        let stations: Vec<(String, Weather)> = stations
            .into_iter()
            .map(|weather| {
                let name = namer.name_for(&weather);
                let id = weather.station_id();
                if !id.is_empty() {
                    by_id.insert(id.to_string(), name.clone());
                }
                debug!("Weather station '{}' written as {}.WTH", id, name);
                (name, weather)
            })
            .collect();

        Self { stations, by_id }
    }

    /// Stations with their file stems
    pub fn stations(&self) -> &[(String, Weather)] {
        &self.stations
    }

    /// File stem assigned to the station of `weather`
    pub fn file_stem_for<'a>(&'a self, weather: &'a Weather) -> Option<&'a str> {
        let id = weather.station_id();
        if id.chars().count() == 8 {
            return Some(id);
        }
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Sequential file name assignment with collision avoidance
struct StationNamer {
    pivot: YearPivot,
    used: HashSet<String>,
    next_default: u32,
}

impl StationNamer {
    fn new(pivot: YearPivot) -> Self {
        Self {
            pivot,
            used: HashSet::new(),
            next_default: FIRST_GENERATED_INSI,
        }
    }

    /// Full 8-character station ids are used verbatim and block generated names
    fn reserve(&mut self, id: &str) {
        if id.chars().count() == 8 {
            self.used.insert(id.to_string());
        }
    }

    fn next_default_name(&mut self) -> String {
        let name = format!("{:X}", self.next_default);
        self.next_default += 1;
        name
    }

    /// Institute code from wst_name, wst_id or dssat_insi
    fn insi_code(weather: &Weather) -> Option<&str> {
        ["wst_name", "wst_id", "dssat_insi"]
            .iter()
            .filter_map(|key| weather.fields.value(key))
            .find(|value| INSI_CODE.is_match(value))
    }

    fn name_for(&mut self, weather: &Weather) -> String {
        let id = weather.station_id();
        if id.chars().count() == 8 {
            return id.to_string();
        }

        let year_duration = year_duration(weather, self.pivot);
        let insi = match Self::insi_code(weather) {
            Some(code) => code.to_string(),
            None => self.next_default_name(),
        };

        let mut name = insi.clone();
        if insi.chars().count() == 4 {
            let clim_id = weather.fields.value_or("clim_id", UNKNOWN_CLIMATE_ID);
            if clim_id.starts_with('0') {
                name.push_str(&year_duration);
            } else {
                name.push_str(clim_id);
            }
        }

        while self.used.contains(&name) {
            name = format!("{}{}", self.next_default_name(), year_duration);
        }
        self.used.insert(name.clone());
        name
    }
}
