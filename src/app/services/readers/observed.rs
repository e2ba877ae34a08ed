//! Observed summary (`.xxA`) reader

use super::{chunk_titles, drop_placeholders};
use crate::app::models::{Experiment, Fields, FieldsExt};
use crate::app::services::fixed_width::dates::resolve_doy;
use crate::app::services::fixed_width::{FormatSpec, RawRecord, YearPivot};
use crate::app::services::line_classifier::{
    ClassifiedLine, FormatStrategy, LineClassifier, SectionMarker,
};
use crate::app::services::lookup::{CropCodes, is_date_variable};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static OBSERVED_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*)\.(\w\w)A$").expect("valid observed file name pattern"));

/// Treatment number column, renamed so it is not taken for a measurement
const TREATMENT_COLUMN: &str = "trno_a";

struct ObservedFormat;

impl FormatStrategy for ObservedFormat {
    fn classify_section(&self, _line: &str) -> SectionMarker {
        SectionMarker::new("meta")
    }

    fn header_layout(&self, _section: &str, _label: &str, header_line: &str) -> Option<FormatSpec> {
        let header = header_line.replacen('@', " ", 1);
        let spec = chunk_titles(&header, 0)
            .into_iter()
            .map(|title| {
                if title == "trno" {
                    (TREATMENT_COLUMN.to_string(), 6)
                } else {
                    (title, 6)
                }
            });
        Some(FormatSpec::from_fields(spec))
    }
}

/// Reads observed summary files into per-treatment experiments
#[derive(Debug, Clone)]
pub struct ObservedReader<'a> {
    crops: &'a CropCodes,
    pivot: YearPivot,
}

impl<'a> ObservedReader<'a> {
    pub fn new(crops: &'a CropCodes, pivot: YearPivot) -> Self {
        Self { crops, pivot }
    }

    /// Read all observed files; one experiment per `<file base>_<treatment>`
    ///
    /// Rows for the same treatment are merged into one summary record.
    pub fn read_all<'f, I>(&self, files: I) -> Vec<Experiment>
    where
        I: IntoIterator<Item = (&'f str, &'f str)>,
    {
        let mut experiments: Vec<Experiment> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();

        for (file_name, text) in files {
            let (base, crop) = match OBSERVED_FILE_NAME.captures(file_name) {
                Some(caps) => (caps[1].to_string(), caps[2].to_string()),
                None => (super::file_stem(file_name).to_string(), String::new()),
            };
            let crid = self.crops.to_three_char(&crop);
            let mut local_name = String::new();
            let mut classifier = LineClassifier::new(ObservedFormat);

            for line in text.lines() {
                match classifier.classify(line) {
                    ClassifiedLine::Section { text, .. } => {
                        let description = text
                            .rsplit_once(':')
                            .map(|(_, rest)| rest)
                            .unwrap_or(text.as_str())
                            .trim();
                        if description.chars().count() > 10 {
                            let rest: String = description.chars().skip(10).collect();
                            local_name = rest.trim().to_string();
                        }
                    }
                    ClassifiedLine::Data { record, .. } => {
                        let treatment: String = line.chars().take(6).collect();
                        let treatment = treatment.trim();
                        if treatment.is_empty() {
                            warn!("Invalid treatment number found in {}", file_name);
                            continue;
                        }
                        let exname = format!("{}_{}", base, treatment);
                        let index = *index_of.entry(exname.clone()).or_insert_with(|| {
                            let mut fields = Fields::new();
                            fields.insert("exname".to_string(), exname.clone());
                            if !crid.is_empty() {
                                fields.insert("crid".to_string(), crid.clone());
                            }
                            if !local_name.is_empty() {
                                fields.insert("local_name".to_string(), local_name.clone());
                            }
                            experiments.push(Experiment {
                                fields,
                                ..Default::default()
                            });
                            experiments.len() - 1
                        });

                        let experiment = &mut experiments[index];
                        let planting = experiment.observed.summary.value("pdat").map(str::to_string);
                        let record = self.convert_dates(record, planting.as_deref(), file_name);
                        experiment.observed.summary.extend(record);
                    }
                    _ => {}
                }
            }
            debug!("Read observed data from {}", file_name);
        }
        experiments
    }

    /// Drop index columns and convert day-of-year dates to yyyymmdd
    ///
    /// Bare `ddd` days are placed in the year of the observed planting date
    /// (`PDAT`, from this row or an earlier row of the treatment). Without
    /// one they are kept as read.
    fn convert_dates(
        &self,
        mut record: RawRecord,
        planting_date: Option<&str>,
        file_name: &str,
    ) -> RawRecord {
        drop_placeholders(&mut record);
        record.remove(TREATMENT_COLUMN);

        let own_planting = record
            .get("pdat")
            .and_then(|pdat| resolve_doy(pdat, None, self.pivot));
        let reference = own_planting.as_deref().or(planting_date);

        let mut unresolved = Vec::new();
        for (key, value) in record.iter_mut() {
            if !is_date_variable(key) {
                continue;
            }
            match resolve_doy(value, reference, self.pivot) {
                Some(date) => *value = date,
                None if value.len() < 4 && value.parse::<u32>().is_ok() => {
                    unresolved.push(key.clone())
                }
                None => {}
            }
        }
        if !unresolved.is_empty() {
            warn!(
                "Dates {:?} in {} have no planting date to resolve against and are kept as read",
                unresolved, file_name
            );
        }
        record
    }
}
