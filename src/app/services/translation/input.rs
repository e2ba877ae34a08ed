//! Reading DSSAT text files into a dataset

use crate::app::models::Dataset;
use crate::app::services::fixed_width::YearPivot;
use crate::app::services::lookup::CropCodes;
use crate::app::services::readers::{ObservedReader, SoilReader, WeatherReader};
use crate::constants::file_kinds;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Raw input texts keyed by file kind, then by source file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBundle {
    files: BTreeMap<String, BTreeMap<String, String>>,
}

impl InputBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `text` read from `file_name` under the kind tag `kind`
    pub fn insert(
        &mut self,
        kind: impl Into<String>,
        file_name: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.files
            .entry(kind.into())
            .or_default()
            .insert(file_name.into(), text.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_file(
        mut self,
        kind: impl Into<String>,
        file_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(kind, file_name, text);
        self
    }

    /// Files of one kind in file name order
    pub fn files(&self, kind: &str) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .get(kind)
            .into_iter()
            .flat_map(|files| files.iter().map(|(name, text)| (name.as_str(), text.as_str())))
    }

    /// Number of files across all kinds
    pub fn len(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads weather, soil and observed summary files into one dataset
#[derive(Debug, Clone, Default)]
pub struct DssatInput {
    pivot: YearPivot,
    crops: CropCodes,
}

impl DssatInput {
    pub fn new(pivot: YearPivot) -> Self {
        Self {
            pivot,
            crops: CropCodes::new(),
        }
    }

    /// Decode every file in `bundle`
    ///
    /// Observed summaries become experiments; soils and weather stations are
    /// kept as standalone records. Unknown kind tags are ignored.
    pub fn read(&self, bundle: &InputBundle) -> Dataset {
        let weathers = WeatherReader::new(self.pivot).read_all(bundle.files(file_kinds::WEATHER));
        debug!("Read {} weather stations", weathers.len());

        let soils = SoilReader::new().read_all(bundle.files(file_kinds::SOIL));
        debug!("Read {} soil sites", soils.len());

        let experiments =
            ObservedReader::new(&self.crops, self.pivot).read_all(bundle.files(file_kinds::OBSERVED));
        debug!("Read {} observed treatments", experiments.len());

        info!(
            "Read {} files: {} experiments, {} soils, {} weather stations",
            bundle.len(),
            experiments.len(),
            soils.len(),
            weathers.len()
        );

        Dataset {
            experiments,
            soils,
            weathers,
        }
    }
}
