//! Experiment groups and their output file stems

use crate::app::models::Experiment;
use crate::app::services::lookup::CropCodes;
use crate::constants::{FALLBACK_CULTIVAR_FILE, TEMP_STEM_PREFIX, UNKNOWN_CROP_ID};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TREATMENT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d+$").expect("valid treatment suffix pattern"));

/// Group key of an experiment name: the name without its `_<treatment>` suffix
pub fn group_key(exname: &str) -> String {
    TREATMENT_SUFFIX.replace(exname.trim(), "").into_owned()
}

/// Treatments written together to one file per file kind
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentGroup {
    pub key: String,

    /// File stem (8 characters, or a generated `TEMPnnnn`)
    pub stem: String,

    /// 2-character crop id used in file extensions
    pub crid: String,

    /// Whether the stem was generated
    pub generated: bool,

    pub experiments: Vec<Experiment>,
}

impl ExperimentGroup {
    /// `<stem>.<crid><kind>`, e.g. `UFGA8201.MZX`
    pub fn file_name(&self, kind: char) -> String {
        format!("{}.{}{}", self.stem, self.crid, kind)
    }

    /// Cultivar file name for the group
    pub fn cultivar_file_name(&self) -> String {
        if self.generated {
            FALLBACK_CULTIVAR_FILE.to_string()
        } else {
            format!("{}_{}X.CUL", self.stem, self.crid)
        }
    }

    /// Experiment name printed in file headers (`UFGA8201MZ`)
    pub fn display_name(&self) -> String {
        format!("{}{}", self.stem, self.crid)
    }

    /// Scheduler label for one of the group's output tasks
    pub fn task_label(&self, suffix: &str) -> String {
        format!("{}_{}", self.key, suffix)
    }
}

/// Partition experiments by [`group_key`] in key order
///
/// A 10-character key is read as an 8-character name plus a 2-character crop
/// id. An 8-character key is used as the stem with the crop of its first
/// experiment. Anything else gets a generated `TEMPnnnn` stem numbered in
/// group order.
pub fn group_experiments(experiments: &[Experiment], crops: &CropCodes) -> Vec<ExperimentGroup> {
    let mut grouped: BTreeMap<String, Vec<Experiment>> = BTreeMap::new();
    for experiment in experiments {
        grouped
            .entry(group_key(experiment.exname()))
            .or_default()
            .push(experiment.clone());
    }

    let mut temp_counter = 0;
    grouped
        .into_iter()
        .map(|(key, experiments)| {
            let crop = group_crop(&experiments, crops);
            let chars: Vec<char> = key.chars().collect();
            let (stem, crid, generated) = match chars.len() {
                10 => (
                    chars[..8].iter().collect::<String>(),
                    chars[8..].iter().collect::<String>().to_uppercase(),
                    false,
                ),
                8 => (key.clone(), crop, false),
                _ => {
                    temp_counter += 1;
                    (format!("{}{:04}", TEMP_STEM_PREFIX, temp_counter), crop, true)
                }
            };
            ExperimentGroup {
                key,
                stem,
                crid,
                generated,
                experiments,
            }
        })
        .collect()
}

/// 2-character crop id of the first experiment, or `XX`
fn group_crop(experiments: &[Experiment], crops: &CropCodes) -> String {
    experiments
        .first()
        .and_then(|e| e.crop_id())
        .map(|crid| crops.to_two_char(crid))
        .filter(|crid| crid.chars().count() == 2)
        .unwrap_or_else(|| UNKNOWN_CROP_ID.to_string())
}
