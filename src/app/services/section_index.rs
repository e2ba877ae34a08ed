//! Factor level assignment for repeated experiment sections
//!
//! Treatments in one experiment file reference their cultivar, field,
//! management events and so on by level number. A [`SectionIndex`] keeps one
//! ordered list of distinct components per [`SectionCategory`]; treatments
//! sharing identical content reuse the same level.
//!
//! Each output file owns its own index, and levels must be assigned in
//! treatment order since the numbering follows first appearance.

use crate::app::models::{Event, Fields, LayeredRecord};
use std::collections::HashMap;

/// Structural categories of the treatment table, in factor column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionCategory {
    Cultivar,
    Field,
    SoilAnalysis,
    InitialConditions,
    Planting,
    Irrigation,
    Fertilizer,
    OrganicMatter,
    Chemical,
    Tillage,
    EnvironmentModification,
    Harvest,
    SimulationControl,
}

impl SectionCategory {
    pub const ALL: [SectionCategory; 13] = [
        Self::Cultivar,
        Self::Field,
        Self::SoilAnalysis,
        Self::InitialConditions,
        Self::Planting,
        Self::Irrigation,
        Self::Fertilizer,
        Self::OrganicMatter,
        Self::Chemical,
        Self::Tillage,
        Self::EnvironmentModification,
        Self::Harvest,
        Self::SimulationControl,
    ];

    /// Column label in the treatment table header
    pub fn factor_label(&self) -> &'static str {
        match self {
            Self::Cultivar => "CU",
            Self::Field => "FL",
            Self::SoilAnalysis => "SA",
            Self::InitialConditions => "IC",
            Self::Planting => "MP",
            Self::Irrigation => "MI",
            Self::Fertilizer => "MF",
            Self::OrganicMatter => "MR",
            Self::Chemical => "MC",
            Self::Tillage => "MT",
            Self::EnvironmentModification => "ME",
            Self::Harvest => "MH",
            Self::SimulationControl => "SM",
        }
    }
}

/// Content of one section entry
///
/// Equality is content equality: field maps compare their canonical field
/// sets and event lists compare element-wise in order. Blank values count as
/// absent once a component is [normalized](Component::normalized).
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Record(Fields),
    Layered(LayeredRecord),
    Events(Vec<Event>),
    Lines(Vec<String>),
}

impl Component {
    /// Copy with blank values dropped and the rest trimmed
    ///
    /// Layers and blank lines left without content are dropped as well.
    /// Events are kept even when all their fields are blank, so event counts
    /// still distinguish lists.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Record(fields) => Self::Record(normalize_fields(fields)),
            Self::Layered(record) => Self::Layered(LayeredRecord {
                fields: normalize_fields(&record.fields),
                layers: record
                    .layers
                    .iter()
                    .map(normalize_fields)
                    .filter(|layer| !layer.is_empty())
                    .collect(),
            }),
            Self::Events(events) => Self::Events(
                events
                    .iter()
                    .map(|event| Event::new(event.kind, normalize_fields(&event.fields)))
                    .collect(),
            ),
            Self::Lines(lines) => Self::Lines(
                lines
                    .iter()
                    .filter(|line| !line.trim().is_empty())
                    .cloned()
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Record(fields) => fields.is_empty(),
            Self::Layered(record) => record.is_empty(),
            Self::Events(events) => events.is_empty(),
            Self::Lines(lines) => lines.is_empty(),
        }
    }

    pub fn as_record(&self) -> Option<&Fields> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_layered(&self) -> Option<&LayeredRecord> {
        match self {
            Self::Layered(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_events(&self) -> &[Event] {
        match self {
            Self::Events(events) => events,
            _ => &[],
        }
    }

    pub fn as_lines(&self) -> &[String] {
        match self {
            Self::Lines(lines) => lines,
            _ => &[],
        }
    }
}

/// Trimmed non-blank values of `fields`
fn normalize_fields(fields: &Fields) -> Fields {
    fields
        .iter()
        .filter_map(|(key, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| (key.clone(), value.to_string()))
        })
        .collect()
}

/// Per-file table of distinct section entries
#[derive(Debug, Clone, Default)]
pub struct SectionIndex {
    sections: HashMap<SectionCategory, Vec<Component>>,
}

impl SectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level number of `component` within `category`
    ///
    /// `component` is normalized first. Empty components get level 0 and are
    /// not stored. A component equal to an earlier entry gets that entry's
    /// 1-based level; otherwise it is appended and gets the next level.
    pub fn assign(&mut self, category: SectionCategory, component: Component) -> usize {
        let component = component.normalized();
        if component.is_empty() {
            return 0;
        }

        let entries = self.sections.entry(category).or_default();
        if let Some(position) = entries.iter().position(|entry| *entry == component) {
            return position + 1;
        }
        entries.push(component);
        entries.len()
    }

    /// Distinct entries of `category` in level order
    pub fn entries(&self, category: SectionCategory) -> &[Component] {
        self.sections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct entries in `category`
    pub fn len(&self, category: SectionCategory) -> usize {
        self.entries(category).len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::EventKind;

    fn record(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn event(kind: EventKind, date: &str) -> Event {
        Event::new(kind, record(&[("date", date)]))
    }

    #[test]
    fn test_empty_component_is_level_zero() {
        let mut index = SectionIndex::new();
        assert_eq!(
            index.assign(SectionCategory::Cultivar, Component::Record(Fields::new())),
            0
        );
        assert_eq!(
            index.assign(SectionCategory::Irrigation, Component::Events(Vec::new())),
            0
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_equal_content_reuses_level() {
        let mut index = SectionIndex::new();
        let a = Component::Record(record(&[("crid", "MZ"), ("cul_id", "IB0035")]));
        let b = Component::Record(record(&[("crid", "MZ"), ("cul_id", "IB0063")]));

        assert_eq!(index.assign(SectionCategory::Cultivar, a.clone()), 1);
        assert_eq!(index.assign(SectionCategory::Cultivar, b.clone()), 2);
        assert_eq!(index.assign(SectionCategory::Cultivar, a), 1);
        assert_eq!(index.assign(SectionCategory::Cultivar, b), 2);
        assert_eq!(index.len(SectionCategory::Cultivar), 2);
    }

    #[test]
    fn test_categories_are_independent() {
        let mut index = SectionIndex::new();
        let fields = Component::Record(record(&[("date", "19820301")]));

        assert_eq!(index.assign(SectionCategory::Planting, fields.clone()), 1);
        assert_eq!(index.assign(SectionCategory::Field, fields), 1);
        assert!(index.entries(SectionCategory::Harvest).is_empty());
    }

    #[test]
    fn test_event_lists_compare_in_order() {
        let mut index = SectionIndex::new();
        let first = vec![
            event(EventKind::Fertilizer, "19820301"),
            event(EventKind::Fertilizer, "19820401"),
        ];
        let mut reversed = first.clone();
        reversed.reverse();

        assert_eq!(
            index.assign(SectionCategory::Fertilizer, Component::Events(first.clone())),
            1
        );
        assert_eq!(
            index.assign(SectionCategory::Fertilizer, Component::Events(reversed)),
            2
        );
        assert_eq!(
            index.assign(SectionCategory::Fertilizer, Component::Events(first)),
            1
        );
    }

    #[test]
    fn test_shared_planting_with_distinct_fertilizer() {
        let mut index = SectionIndex::new();
        let planting = record(&[("date", "19820226"), ("plpop", "7.2")]);
        let treatments = [
            vec![event(EventKind::Fertilizer, "19820301")],
            vec![event(EventKind::Fertilizer, "19820315")],
        ];

        let levels: Vec<(usize, usize)> = treatments
            .iter()
            .map(|fertilizer| {
                let mp = index.assign(
                    SectionCategory::Planting,
                    Component::Record(planting.clone()),
                );
                let mf = index.assign(
                    SectionCategory::Fertilizer,
                    Component::Events(fertilizer.clone()),
                );
                (mp, mf)
            })
            .collect();

        assert_eq!(levels, vec![(1, 1), (1, 2)]);
    }

    #[test]
    fn test_blank_values_do_not_split_levels() {
        let mut index = SectionIndex::new();
        let plain = vec![event(EventKind::Fertilizer, "19820301")];
        let mut padded = plain.clone();
        padded[0]
            .fields
            .insert("fecd_note".to_string(), String::new());
        padded[0]
            .fields
            .insert("date".to_string(), " 19820301 ".to_string());

        assert_eq!(
            index.assign(SectionCategory::Fertilizer, Component::Events(plain)),
            1
        );
        assert_eq!(
            index.assign(SectionCategory::Fertilizer, Component::Events(padded)),
            1
        );
        assert_eq!(index.len(SectionCategory::Fertilizer), 1);

        let stored = index.entries(SectionCategory::Fertilizer)[0].as_events();
        assert!(!stored[0].fields.contains_key("fecd_note"));
    }

    #[test]
    fn test_all_blank_components_are_level_zero() {
        let mut index = SectionIndex::new();
        let blank_conditions = LayeredRecord {
            fields: record(&[("icdat", " ")]),
            layers: vec![record(&[("icbl", ""), ("ich2o", "  ")])],
        };

        assert_eq!(
            index.assign(
                SectionCategory::InitialConditions,
                Component::Layered(blank_conditions)
            ),
            0
        );
        assert_eq!(
            index.assign(
                SectionCategory::Cultivar,
                Component::Record(record(&[("cul_id", "")]))
            ),
            0
        );
        assert_eq!(
            index.assign(
                SectionCategory::EnvironmentModification,
                Component::Lines(vec!["   ".to_string()])
            ),
            0
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_factor_labels_follow_column_order() {
        let labels: Vec<&str> = SectionCategory::ALL
            .iter()
            .map(SectionCategory::factor_label)
            .collect();
        assert_eq!(
            labels.join(" "),
            "CU FL SA IC MP MI MF MR MC MT ME MH SM"
        );
    }
}
