//! Soil (`.SOL`) reader

use super::drop_placeholders;
use crate::app::models::{Fields, FieldsExt, Soil};
use crate::app::services::fixed_width::FormatSpec;
use crate::app::services::line_classifier::{
    ClassifiedLine, FormatStrategy, LineClassifier, SectionMarker, column_at, has_column,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static NOTES_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*soils?\s*:?").expect("valid soil notes pattern"));

const SECTION_NOTES: &str = "soil";
const SECTION_SITE: &str = "site";

const SURFACE_FIELDS: &[&str] = &[
    "sscol", "salb", "slu1", "sldr", "slro", "slnf", "slpf", "smhb", "smpx", "smke",
];

const LAYER_FIELDS: &[&str] = &[
    "sllb", "slmh", "slll", "sldul", "slsat", "slrgf", "sksat", "slbdm", "sloc", "slcly", "slsil",
    "slcf", "slni", "slphw", "slphb", "slcec", "sladc",
];

const LAYER_CHEMISTRY_FIELDS: &[&str] = &[
    "slal", "slfe", "slmn", "slbs", "slpa", "slpb", "slke", "slmg", "slna", "slsu", "slec",
];

/// Data blocks of a soil site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SoilBlock {
    Site,
    Surface,
    Layers,
    LayerChemistry { with_caco3: bool },
}

impl SoilBlock {
    fn from_label(label: &str) -> Option<Self> {
        match (column_at(label, 0), column_at(label, 1)) {
            (Some("site"), _) => Some(Self::Site),
            (Some("scom"), _) => Some(Self::Surface),
            (Some("slb"), Some("slmh")) => Some(Self::Layers),
            (Some("slb"), Some("slpx")) => Some(Self::LayerChemistry {
                with_caco3: has_column(label, "caco3"),
            }),
            _ => None,
        }
    }

    fn layout(self) -> FormatSpec {
        match self {
            Self::Site => FormatSpec::new()
                .with("sl_loc_3", 12)
                .with("sl_loc_1", 12)
                .with("soil_lat", 10)
                .with("soil_long", 8)
                .with("classification", 51),
            Self::Surface => FormatSpec::from_fields(SURFACE_FIELDS.iter().map(|f| (*f, 6))),
            Self::Layers => FormatSpec::from_fields(LAYER_FIELDS.iter().map(|f| (*f, 6))),
            Self::LayerChemistry { with_caco3 } => {
                let mut spec = FormatSpec::new()
                    .with("sllb", 6)
                    .with("slpx", 6)
                    .with("slpt", 6)
                    .with("slpo", 6)
                    .with(if with_caco3 { "caco3" } else { "slca" }, 6);
                for field in LAYER_CHEMISTRY_FIELDS {
                    spec.push(*field, 6);
                }
                if with_caco3 {
                    spec.push("slca", 6);
                }
                spec
            }
        }
    }
}

struct SoilFormat;

impl FormatStrategy for SoilFormat {
    fn classify_section(&self, line: &str) -> SectionMarker {
        if line.to_lowercase().find("soil") == Some(1) {
            SectionMarker::new(SECTION_NOTES)
        } else {
            SectionMarker::new(SECTION_SITE)
        }
    }

    fn section_layout(&self, section: &str) -> Option<FormatSpec> {
        (section == SECTION_SITE).then(|| {
            FormatSpec::new()
                .with("soil_id", 10)
                .with("sl_source", 13)
                .with("sltx", 6)
                .with("sldp", 6)
                .with("soil_name", 51)
        })
    }

    fn header_layout(&self, section: &str, label: &str, _header_line: &str) -> Option<FormatSpec> {
        if section != SECTION_SITE {
            return None;
        }
        SoilBlock::from_label(label).map(SoilBlock::layout)
    }
}

/// Merge `layer` into the layer with the same depth, or append it
fn merge_layer(layers: &mut Vec<Fields>, layer: Fields) {
    let position = layer
        .value("sllb")
        .and_then(|depth| layers.iter().position(|l| l.value("sllb") == Some(depth)));
    match position {
        Some(index) => layers[index].extend(layer),
        None => layers.push(layer),
    }
}

/// Reads soil files into soil sites
#[derive(Debug, Clone, Copy, Default)]
pub struct SoilReader;

impl SoilReader {
    pub fn new() -> Self {
        Self
    }

    /// Read all soil files in order
    ///
    /// The notes of the most recent `*SOILS` line are copied onto every site
    /// that follows it.
    pub fn read_all<'a, I>(&self, files: I) -> Vec<Soil>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut sites: Vec<Soil> = Vec::new();
        let mut notes = String::new();

        for (file_name, text) in files {
            let mut classifier = LineClassifier::new(SoilFormat);
            let mut current: Option<usize> = None;

            for line in text.lines() {
                match classifier.classify(line) {
                    ClassifiedLine::Section {
                        section, record, ..
                    } => {
                        if section == SECTION_NOTES {
                            notes = NOTES_PREFIX.replace(line, "").trim().to_string();
                            current = None;
                            continue;
                        }
                        let mut fields = record.unwrap_or_default();
                        if !notes.is_empty() {
                            fields.insert("sl_notes".to_string(), notes.clone());
                        }
                        current = Some(sites.len());
                        sites.push(Soil {
                            fields,
                            layers: Vec::new(),
                        });
                    }
                    ClassifiedLine::Data {
                        label, mut record, ..
                    } => {
                        let Some(site) = current.and_then(|i| sites.get_mut(i)) else {
                            continue;
                        };
                        drop_placeholders(&mut record);
                        match SoilBlock::from_label(&label) {
                            Some(SoilBlock::Site) | Some(SoilBlock::Surface) => {
                                site.fields.extend(record)
                            }
                            Some(SoilBlock::Layers) => site.layers.push(record),
                            Some(SoilBlock::LayerChemistry { .. }) => {
                                merge_layer(&mut site.layers, record)
                            }
                            None => {}
                        }
                    }
                    _ => {}
                }
            }
            debug!("Read soil file {} ({} sites so far)", file_name, sites.len());
        }
        sites
    }
}
