//! Observed time series (`.xxT`) writer

use super::observed::observed_plan;
use super::{RenderedFile, WriterContext, push_line};
use crate::app::models::{Fields, FieldsExt, copy_field};
use crate::app::services::fixed_width::{EncodeContext, FieldSpec, WarningLog, encode};
use crate::app::services::grouping::ExperimentGroup;
use crate::constants::{
    DEFAULT_BLANK, LINE_ENDING, MAX_OBSERVED_NAME_LEN, TIME_SERIES_FIELDS_PER_LINE,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Render the time series file of `group`
///
/// Records of each treatment are written in date order. The treatment number
/// is the position of the experiment within the group. Returns `None` when no
/// treatment has time series data.
pub fn render_time_series_file(
    group: &ExperimentGroup,
    _ctx: &WriterContext,
) -> Option<RenderedFile> {
    let treatments: Vec<(usize, Vec<&Fields>)> = group
        .experiments
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.observed.time_series.is_empty())
        .map(|(idx, e)| {
            let mut records: Vec<&Fields> = e.observed.time_series.iter().collect();
            records.sort_by(|a, b| a.value_or("date", "").cmp(b.value_or("date", "")));
            (idx + 1, records)
        })
        .collect();
    if treatments.is_empty() {
        return None;
    }

    let mut warnings = WarningLog::new();
    let mut titles: BTreeSet<&str> = BTreeSet::new();
    let mut unsuitable: BTreeSet<&str> = BTreeSet::new();
    for (_, records) in &treatments {
        for record in records {
            for key in record.keys() {
                if key == "date" || key == "trno" {
                    continue;
                }
                if key.chars().count() <= MAX_OBSERVED_NAME_LEN {
                    titles.insert(key.as_str());
                } else if unsuitable.insert(key.as_str()) {
                    warnings.unsuitable_observed(key);
                }
            }
        }
    }

    let first = group.experiments.first();
    let pdate = first.and_then(|e| e.planting_date());
    let titles: Vec<&str> = titles.into_iter().collect();

    let mut data = String::new();
    push_line(
        &mut data,
        &format!(
            "*EXP.DATA (T): {:<10} {}",
            group.display_name(),
            first
                .map(|e| e.fields.value_or("local_name", DEFAULT_BLANK))
                .unwrap_or(DEFAULT_BLANK)
        ),
    );
    data.push_str(LINE_ENDING);

    for chunk in titles.chunks(TIME_SERIES_FIELDS_PER_LINE) {
        let header: String = chunk
            .iter()
            .map(|title| format!("{:>6}", title.to_uppercase()))
            .collect();
        push_line(&mut data, &format!("@TRNO   DATE{}", header));

        for (number, records) in &treatments {
            for record in records {
                let columns: Vec<(&str, &str)> = chunk.iter().map(|&t| (t, t)).collect();
                let (mut row, mut plan) = observed_plan(&columns, record, pdate, false);
                row.insert("trno".to_string(), number.to_string());
                copy_field(&mut row, record, "date");
                plan.insert(0, FieldSpec::date("date", 5).gap(1));
                plan.insert(0, FieldSpec::number("trno", 5).gap(1));

                let mut ctx = EncodeContext::new(&mut warnings).with_reference_date(pdate);
                push_line(&mut data, &encode(&row, &plan, &mut ctx));
            }
        }
    }
    data.push_str(LINE_ENDING);

    debug!(
        "Rendered time series for {} with {} treatments",
        group.key,
        treatments.len()
    );

    let mut content = warnings.render();
    content.push_str(&data);
    Some(RenderedFile::new(group.file_name('T'), content))
}
