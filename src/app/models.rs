//! Data models for DSSAT translation
//!
//! This module contains the structured records exchanged between the readers,
//! the grouping service and the writers. Field values are kept as strings in
//! an ordered map keyed by their ICASA/ACE variable name, so derived equality
//! on any record is content equality over a canonical field set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered field-name → value mapping
pub type Fields = BTreeMap<String, String>;

/// Read access to field maps that treats blank values as absent
pub trait FieldsExt {
    /// Trimmed value of `key`, `None` when absent or blank
    fn value(&self, key: &str) -> Option<&str>;

    /// Trimmed value of `key`, or `default`
    fn value_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.value(key).unwrap_or(default)
    }

    /// Whether `key` carries a non-blank value
    fn has(&self, key: &str) -> bool {
        self.value(key).is_some()
    }
}

impl FieldsExt for Fields {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

/// Copy `key` from `source` into `target` when present
pub fn copy_field(target: &mut Fields, source: &Fields, key: &str) {
    copy_field_as(target, source, key, key);
}

/// Copy `from` in `source` into `target` under the name `to` when present
pub fn copy_field_as(target: &mut Fields, source: &Fields, to: &str, from: &str) {
    if let Some(value) = source.value(from) {
        target.insert(to.to_string(), value.to_string());
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Complete translation input or output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub experiments: Vec<Experiment>,

    /// Soils not attached to any experiment
    #[serde(default)]
    pub soils: Vec<Soil>,

    /// Weather stations not attached to any experiment
    #[serde(default)]
    pub weathers: Vec<Weather>,
}

impl Dataset {
    /// Whether the dataset holds nothing to translate
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty() && self.soils.is_empty() && self.weathers.is_empty()
    }

    /// Total daily weather records over attached and standalone stations
    pub fn daily_weather_count(&self) -> usize {
        let attached: usize = self
            .experiments
            .iter()
            .filter_map(|e| e.weather.as_ref())
            .map(|w| w.daily.len())
            .sum();
        let standalone: usize = self.weathers.iter().map(|w| w.daily.len()).sum();
        attached + standalone
    }
}

// =============================================================================
// Experiment
// =============================================================================

/// One treatment of an experiment with its linked soil, weather and management
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment-level fields (exname, trt_name, crid, local_name, fl_*, ...)
    #[serde(default)]
    pub fields: Fields,

    /// Management events in encounter order
    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(default)]
    pub initial_conditions: LayeredRecord,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<Soil>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,

    #[serde(default)]
    pub observed: ObservedData,

    /// Prepared simulation control lines (sm_general, sm_options, ...)
    #[serde(default)]
    pub simulation_control: Fields,

    /// Pre-rendered environment modification rows
    #[serde(default)]
    pub environment_modifications: Vec<String>,

    /// Cultivar coefficient lines carried for the cultivar file
    #[serde(default)]
    pub cultivar_records: Vec<CultivarRecord>,
}

impl Experiment {
    /// Experiment name, empty when absent
    pub fn exname(&self) -> &str {
        self.fields.value_or("exname", "")
    }

    /// Date of the first planting event
    pub fn planting_date(&self) -> Option<&str> {
        self.events
            .iter()
            .find(|e| e.kind == EventKind::Planting)
            .and_then(|e| e.fields.value("date"))
    }

    /// Crop id from the experiment or, failing that, its planting event
    pub fn crop_id(&self) -> Option<&str> {
        self.fields.value("crid").or_else(|| {
            self.events
                .iter()
                .filter(|e| e.kind == EventKind::Planting)
                .find_map(|e| e.fields.value("crid"))
        })
    }

    /// Events of one kind in encounter order
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

/// Management event variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Planting,
    Irrigation,
    Fertilizer,
    OrganicMatter,
    Chemical,
    Tillage,
    Harvest,
}

/// One dated management event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Event fields including `date` (yyyymmdd)
    #[serde(default)]
    pub fields: Fields,
}

impl Event {
    pub fn new(kind: EventKind, fields: Fields) -> Self {
        Self { kind, fields }
    }
}

/// A record with an attached list of per-layer records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeredRecord {
    #[serde(default)]
    pub fields: Fields,

    #[serde(default)]
    pub layers: Vec<Fields>,
}

impl LayeredRecord {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.layers.is_empty()
    }
}

/// Observed measurements of one treatment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedData {
    /// End-of-season summary values
    #[serde(default)]
    pub summary: Fields,

    /// In-season records, each with a `date`
    #[serde(default)]
    pub time_series: Vec<Fields>,
}

/// One cultivar coefficient line with its section header and column titles
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CultivarRecord {
    #[serde(default)]
    pub header_info: String,

    #[serde(default)]
    pub cul_titles: String,

    #[serde(default)]
    pub cul_info: String,
}

// =============================================================================
// Soil
// =============================================================================

/// Soil profile (site fields plus layers)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Soil {
    #[serde(default)]
    pub fields: Fields,

    #[serde(default)]
    pub layers: Vec<Fields>,
}

impl Soil {
    /// Soil id, empty when absent
    pub fn soil_id(&self) -> &str {
        self.fields.value_or("soil_id", "")
    }
}

// =============================================================================
// Weather
// =============================================================================

/// Weather station with its daily series in ascending date order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub fields: Fields,

    /// Daily records, each keyed by `w_date` (yyyymmdd)
    #[serde(default)]
    pub daily: Vec<Fields>,
}

impl Weather {
    /// Station id, empty when absent
    pub fn station_id(&self) -> &str {
        self.fields.value_or("wst_id", "")
    }
}
