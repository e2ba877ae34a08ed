//! Observed summary (`.xxA`) writer

use super::{RenderedFile, WriterContext, push_line};
use crate::app::models::{Fields, FieldsExt, copy_field_as};
use crate::app::services::fixed_width::dates::add_days;
use crate::app::services::fixed_width::{EncodeContext, FieldSpec, WarningLog, encode};
use crate::app::services::grouping::ExperimentGroup;
use crate::app::services::lookup::{dap_date_counterpart, is_dap_alternate, is_date_variable};
use crate::constants::{
    DEFAULT_BLANK, LINE_ENDING, MAX_OBSERVED_NAME_LEN, SUMMARY_FIELDS_PER_LINE,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Summary variables every treatment should report, with their alternates
const REQUIRED_SUMMARY: &[(&str, Option<&str>)] = &[
    ("hwam", Some("hwah")),
    ("mdat", Some("mdap")),
    ("adat", Some("adap")),
    ("cwam", None),
];

/// Source field for `title` in `record`: the title itself, else its alternate
fn source_of<'a>(title: &'a str, record: &Fields) -> &'a str {
    if record.has(title) {
        return title;
    }
    REQUIRED_SUMMARY
        .iter()
        .find(|(required, _)| *required == title)
        .and_then(|(_, alternate)| *alternate)
        .filter(|alternate| record.has(alternate))
        .unwrap_or(title)
}

/// Working record and encode plan for one observed data line
///
/// `columns` pairs each title with the field it is read from. Dates become
/// yyddd (or ddd when `day_only`), days-after-planting alternates are moved
/// onto the calendar through `planting_date`, days-after-planting titles with
/// only the date observed are counted back from `planting_date`, and
/// everything else is a 5-wide number.
pub(crate) fn observed_plan(
    columns: &[(&str, &str)],
    record: &Fields,
    planting_date: Option<&str>,
    day_only: bool,
) -> (Fields, Vec<FieldSpec>) {
    let date_column = |title: &str| {
        let spec = if day_only {
            FieldSpec::day_of_year(title, 5)
        } else {
            FieldSpec::date(title, 5)
        };
        spec.gap(1)
    };

    let mut row = Fields::new();
    let mut plan = Vec::with_capacity(columns.len());
    for &(title, source) in columns {
        let observed_date = dap_date_counterpart(title)
            .filter(|date| !record.has(title) && record.has(date))
            .filter(|_| planting_date.is_some());

        if is_dap_alternate(title, source) {
            let date = record
                .value(source)
                .zip(planting_date)
                .and_then(|(days, pdate)| add_days(pdate, days));
            if let Some(date) = date {
                row.insert(title.to_string(), date);
            }
            plan.push(date_column(title));
        } else if let Some(date) = observed_date {
            copy_field_as(&mut row, record, title, date);
            plan.push(FieldSpec::relative_date(title, 5).gap(1));
        } else if is_date_variable(title) {
            copy_field_as(&mut row, record, title, source);
            plan.push(date_column(title));
        } else {
            copy_field_as(&mut row, record, title, source);
            plan.push(FieldSpec::number(title, 5).gap(1));
        }
    }
    (row, plan)
}

/// Render the observed summary file of `group`
///
/// Returns `None` when no treatment of the group has summary data.
pub fn render_observed_file(group: &ExperimentGroup, _ctx: &WriterContext) -> Option<RenderedFile> {
    let experiments = &group.experiments;
    if experiments.iter().all(|e| e.observed.summary.is_empty()) {
        return None;
    }

    let mut warnings = WarningLog::new();
    let mut titles: BTreeSet<&str> = BTreeSet::new();
    let mut unsuitable: BTreeSet<&str> = BTreeSet::new();

    for experiment in experiments {
        let record = &experiment.observed.summary;
        for key in record.keys() {
            if !record.has(key) || key == "trno" {
                continue;
            }
            if key.chars().count() <= MAX_OBSERVED_NAME_LEN {
                titles.insert(key.as_str());
            } else if unsuitable.insert(key.as_str()) {
                warnings.unsuitable_observed(key);
            }
        }

        for &(title, alternate) in REQUIRED_SUMMARY {
            if record.has(title) {
                continue;
            }
            match alternate.filter(|alt| record.has(alt)) {
                Some(_) => {
                    titles.insert(title);
                }
                None => warnings.missing(title),
            }
        }
    }

    let titles: Vec<&str> = titles.into_iter().collect();
    let mut data = String::new();
    push_line(
        &mut data,
        &format!(
            "*EXP.DATA (A): {:<10} {}",
            group.display_name(),
            experiments
                .first()
                .map(|e| e.fields.value_or("local_name", DEFAULT_BLANK))
                .unwrap_or(DEFAULT_BLANK)
        ),
    );
    data.push_str(LINE_ENDING);

    for chunk in titles.chunks(SUMMARY_FIELDS_PER_LINE) {
        let header: String = chunk
            .iter()
            .map(|title| format!("{:>6}", title.to_uppercase()))
            .collect();
        push_line(&mut data, &format!("@TRNO {}", header));

        for (number, experiment) in experiments.iter().enumerate() {
            let record = &experiment.observed.summary;
            let pdate = experiment.planting_date();
            let columns: Vec<(&str, &str)> = chunk
                .iter()
                .map(|&title| (title, source_of(title, record)))
                .collect();
            let (mut row, mut plan) = observed_plan(&columns, record, pdate, true);
            row.insert("trno".to_string(), (number + 1).to_string());
            plan.insert(0, FieldSpec::number("trno", 5).gap(1));

            let mut ctx = EncodeContext::new(&mut warnings).with_reference_date(pdate);
            push_line(&mut data, &encode(&row, &plan, &mut ctx));
        }
    }

    debug!(
        "Rendered observed summary for {} with {} variables",
        group.key,
        titles.len()
    );

    let mut content = warnings.render();
    content.push_str(&data);
    Some(RenderedFile::new(group.file_name('A'), content))
}
