//! Soil file groups

use crate::app::models::{Dataset, Soil};
use crate::constants::FALLBACK_SOIL_FILE;
use std::collections::BTreeMap;

/// Soil sites written to one `.SOL` file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilGroup {
    /// First two characters of the soil ids, empty for ids shorter than that
    pub key: String,

    pub soils: Vec<Soil>,

    /// soil_id → comma-separated names of the experiments using it
    pub experiment_names: BTreeMap<String, String>,
}

impl SoilGroup {
    pub fn file_name(&self) -> String {
        if self.key.is_empty() {
            FALLBACK_SOIL_FILE.to_string()
        } else {
            format!("{}.SOL", self.key)
        }
    }

    /// Experiments referencing `soil_id`, if any
    pub fn experiments_for(&self, soil_id: &str) -> Option<&str> {
        self.experiment_names.get(soil_id).map(String::as_str)
    }
}

fn soil_group_key(soil: &Soil) -> String {
    let id = soil.soil_id();
    if id.chars().count() < 2 {
        String::new()
    } else {
        id.chars().take(2).collect()
    }
}

/// Group the soils used by the dataset's experiments
///
/// Experiments without a soil are skipped. A dataset without experiments
/// groups its standalone soils instead. A soil shared by several experiments
/// is written once.
pub fn group_soils(dataset: &Dataset) -> Vec<SoilGroup> {
    let mut groups: BTreeMap<String, SoilGroup> = BTreeMap::new();

    let mut add = |soil: &Soil, exname: Option<&str>| {
        let key = soil_group_key(soil);
        let group = groups.entry(key.clone()).or_insert_with(|| SoilGroup {
            key,
            ..Default::default()
        });
        if !group.soils.contains(soil) {
            group.soils.push(soil.clone());
        }
        if let Some(exname) = exname {
            let exname = if exname.is_empty() { "N/A" } else { exname };
            group
                .experiment_names
                .entry(soil.soil_id().to_string())
                .and_modify(|names| {
                    names.push(',');
                    names.push_str(exname);
                })
                .or_insert_with(|| exname.to_string());
        }
    };

    if dataset.experiments.is_empty() {
        for soil in &dataset.soils {
            add(soil, None);
        }
    } else {
        for experiment in &dataset.experiments {
            if let Some(soil) = &experiment.soil {
                add(soil, Some(experiment.exname()));
            }
        }
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Experiment, Fields};

    fn soil(id: &str) -> Soil {
        let mut fields = Fields::new();
        if !id.is_empty() {
            fields.insert("soil_id".to_string(), id.to_string());
        }
        Soil {
            fields,
            layers: Vec::new(),
        }
    }

    fn experiment(exname: &str, soil: Option<Soil>) -> Experiment {
        let mut fields = Fields::new();
        fields.insert("exname".to_string(), exname.to_string());
        Experiment {
            fields,
            soil,
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_by_id_prefix_and_records_experiments() {
        let dataset = Dataset {
            experiments: vec![
                experiment("UFGA8201MZ_1", Some(soil("IBMZ910014"))),
                experiment("UFGA8201MZ_2", Some(soil("IBMZ910014"))),
                experiment("UFGA8201MZ_3", Some(soil("IB00000001"))),
                experiment("KSAS8101WH_1", Some(soil("KS00000001"))),
                experiment("NOSOIL01MZ_1", None),
            ],
            ..Default::default()
        };

        let groups = group_soils(&dataset);
        assert_eq!(groups.len(), 2);

        let ib = &groups[0];
        assert_eq!(ib.file_name(), "IB.SOL");
        assert_eq!(ib.soils.len(), 2);
        assert_eq!(
            ib.experiments_for("IBMZ910014"),
            Some("UFGA8201MZ_1,UFGA8201MZ_2")
        );
        assert_eq!(groups[1].file_name(), "KS.SOL");
    }

    #[test]
    fn test_standalone_soils_and_fallback_name() {
        let dataset = Dataset {
            soils: vec![soil(""), soil("X"), soil("IBMZ910014")],
            ..Default::default()
        };

        let groups = group_soils(&dataset);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].file_name(), "soil.SOL");
        assert_eq!(groups[0].soils.len(), 2);
        assert_eq!(groups[0].experiments_for(""), None);
    }
}
