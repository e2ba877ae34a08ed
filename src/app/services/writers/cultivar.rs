//! Cultivar coefficient (`.CUL`) writer

use super::{RenderedFile, push_line};
use crate::app::models::CultivarRecord;
use crate::app::services::grouping::ExperimentGroup;
use std::collections::HashSet;
use tracing::debug;

/// Render the cultivar file shared by `groups`
///
/// Groups with generated stems all write to the same fallback file, so the
/// caller passes every group mapping to one file name together. Identical
/// records are written once; the section header and column titles are
/// repeated whenever they change. Returns `None` when there are no records.
pub fn render_cultivar_file(groups: &[&ExperimentGroup]) -> Option<RenderedFile> {
    let name = groups.first()?.cultivar_file_name();

    let mut seen: HashSet<&CultivarRecord> = HashSet::new();
    let mut last_header = "";
    let mut last_titles = "";
    let mut content = String::new();

    let records = groups
        .iter()
        .flat_map(|g| g.experiments.iter())
        .flat_map(|e| e.cultivar_records.iter());
    for record in records {
        if !seen.insert(record) {
            continue;
        }
        if record.header_info != last_header {
            last_header = &record.header_info;
            last_titles = &record.cul_titles;
            push_line(&mut content, last_header);
            push_line(&mut content, last_titles);
        }
        if record.cul_titles != last_titles {
            last_titles = &record.cul_titles;
            push_line(&mut content, last_titles);
        }
        push_line(&mut content, &record.cul_info);
    }

    if seen.is_empty() {
        return None;
    }
    debug!("Rendered {} cultivar records into {}", seen.len(), name);
    Some(RenderedFile::new(name, content))
}
