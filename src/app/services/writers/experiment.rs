//! Experiment (`.xxX`) writer
//!
//! One file per experiment group. Each treatment becomes one row of the
//! treatment table; its cultivar, field, management and control sections are
//! numbered through a fresh [`SectionIndex`] so identical sections are
//! written once and referenced by level.
//!
//! File order: warnings, applied DOME info, general section, notes, then the
//! data sections.

use super::{RenderedFile, WriterContext, push_line};
use crate::app::models::{
    Event, EventKind, Experiment, Fields, FieldsExt, LayeredRecord, copy_field, copy_field_as,
};
use crate::app::services::fixed_width::dates::to_doy;
use crate::app::services::fixed_width::values::text_value;
use crate::app::services::fixed_width::{EncodeContext, FieldSpec, WarningLog, encode};
use crate::app::services::grouping::ExperimentGroup;
use crate::app::services::section_index::{Component, SectionCategory, SectionIndex};
use crate::constants::{DEFAULT_BLANK, DEFAULT_VALUE, LINE_ENDING, MAX_SOIL_ID_LEN, NOTES_WRAP_WIDTH};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

static SOIL_ID_WITH_TREATMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+_\d+$").expect("valid soil id pattern"));

/// Treatment names of seasonal runs end in a `__<n>` season counter
static SEASONAL_TREATMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+[^_])__\d+$").expect("valid seasonal name pattern"));

const PLOT_FIELDS: &[&str] = &[
    "plta", "pltr#", "pltln", "pldr", "pltsp", "pllay", "pltha", "plth#", "plthl", "plthm",
];

const FIELD_FIELDS: &[&str] = &[
    "id_field", "flsl", "flob", "fl_drntype", "fldrd", "fldrs", "flst",
];

const FIELD_LOCATION_FIELDS: &[&str] = &[
    "fl_name", "fl_lat", "fl_long", "flele", "farea", "fllwr", "flsla", "flhst", "fhdur",
];

const CULTIVAR_FIELDS: &[&str] = &["cul_name", "crid", "cul_id", "dssat_cul_id", "rm", "cul_notes"];

const PLANTING_FIELDS: &[&str] = &[
    "date", "edate", "plpop", "plpoe", "plma", "plds", "plrs", "plrd", "pldp", "plmwt", "page",
    "plenv", "plph", "plspl", "pl_name",
];

const SIMULATION_FIELDS: &[&str] = &[
    "sm_general",
    "sm_options",
    "sm_methods",
    "sm_management",
    "sm_outputs",
    "sm_planting",
    "sm_irrigation",
    "sm_nitrogen",
    "sm_residues",
    "sm_harvests",
];

/// Render the experiment file of `group`
pub fn render_experiment_file(group: &ExperimentGroup, ctx: &WriterContext) -> Option<RenderedFile> {
    let first = group.experiments.first()?;
    let mut warnings = WarningLog::new();
    let mut notes = String::new();
    let mut data = String::new();

    let general = general_section(group, first, &mut warnings, &mut notes);

    let mut index = SectionIndex::new();
    let mut domes = AppliedDomes::default();
    push_line(
        &mut data,
        "*TREATMENTS                        -------------FACTOR LEVELS------------",
    );
    push_line(
        &mut data,
        "@N R O C TNAME.................... CU FL SA IC MP MI MF MR MC MT ME MH SM",
    );
    for (number, experiment) in group.experiments.iter().enumerate() {
        let name = experiment
            .fields
            .value("trt_name")
            .unwrap_or_else(|| experiment.exname());
        let name = if name.is_empty() { DEFAULT_VALUE } else { name };
        domes.record(name, &experiment.fields);
        let name = text_value(25, Some(name), "trt_name", DEFAULT_VALUE, &mut warnings);

        let levels: Vec<String> = treatment_components(experiment, ctx)
            .into_iter()
            .map(|(category, component)| {
                let level = index.assign(category, component);
                if category == SectionCategory::SimulationControl {
                    level.max(1)
                } else {
                    level
                }
            })
            .map(|level| format!("{:>2}", level))
            .collect();

        push_line(
            &mut data,
            &format!(
                "{:<3}1 1 0 {:<25} {}",
                format!("{:>2}", number + 1),
                name,
                levels.join(" ")
            ),
        );
    }
    data.push_str(LINE_ENDING);

    let pdate = first.planting_date();
    cultivar_section(&index, &mut warnings, &mut notes, &mut data);
    field_section(&index, &mut warnings, &mut data);
    soil_analysis_section(&index, &mut warnings, &mut data);
    initial_conditions_section(&index, pdate, ctx, &mut warnings, &mut data);
    planting_section(&index, &mut warnings, &mut data);
    irrigation_section(&index, &mut warnings, &mut data);
    fertilizer_section(&index, &mut warnings, &mut data);
    organic_matter_section(&index, &mut warnings, &mut data);
    chemical_section(&index, &mut warnings, &mut data);
    tillage_section(&index, &mut warnings, &mut data);
    environment_section(&index, &mut data);
    harvest_section(&index, &mut warnings, &mut data);

    push_line(&mut data, "*SIMULATION CONTROLS");
    let controls = index.entries(SectionCategory::SimulationControl);
    if controls.is_empty() {
        data.push_str(&simulation_block(1, &Fields::new()));
    } else {
        for (idx, entry) in controls.iter().enumerate() {
            if let Some(fields) = entry.as_record() {
                data.push_str(&simulation_block(idx + 1, fields));
            }
        }
    }

    debug!(
        "Rendered experiment file for {} with {} treatments and {} warnings",
        group.key,
        group.experiments.len(),
        warnings.len()
    );

    let mut content = warnings.render();
    content.push_str(&domes.render());
    content.push_str(&general);
    content.push_str(&notes);
    content.push_str(&data);
    Some(RenderedFile::new(group.file_name('X'), content))
}

// =============================================================================
// Treatment components
// =============================================================================

/// Sections referenced by one treatment, in factor column order
fn treatment_components(
    experiment: &Experiment,
    ctx: &WriterContext,
) -> Vec<(SectionCategory, Component)> {
    let mut cultivar = Fields::new();
    let mut planting = Fields::new();
    for event in experiment.events_of(EventKind::Planting) {
        for key in CULTIVAR_FIELDS {
            copy_field(&mut cultivar, &event.fields, key);
        }
        for key in PLANTING_FIELDS {
            copy_field(&mut planting, &event.fields, key);
        }
    }
    if let Some(crid) = cultivar.value("crid") {
        let crid = ctx.crops.to_two_char(crid);
        cultivar.insert("crid".to_string(), crid);
    }

    let events = |kind: EventKind| -> Component {
        Component::Events(experiment.events_of(kind).cloned().collect::<Vec<Event>>())
    };

    vec![
        (SectionCategory::Cultivar, Component::Record(cultivar)),
        (SectionCategory::Field, Component::Record(field_record(experiment, ctx))),
        (SectionCategory::SoilAnalysis, Component::Layered(soil_analysis(experiment))),
        (
            SectionCategory::InitialConditions,
            Component::Layered(experiment.initial_conditions.clone()),
        ),
        (SectionCategory::Planting, Component::Record(planting)),
        (SectionCategory::Irrigation, events(EventKind::Irrigation)),
        (SectionCategory::Fertilizer, events(EventKind::Fertilizer)),
        (SectionCategory::OrganicMatter, events(EventKind::OrganicMatter)),
        (SectionCategory::Chemical, events(EventKind::Chemical)),
        (SectionCategory::Tillage, events(EventKind::Tillage)),
        (
            SectionCategory::EnvironmentModification,
            Component::Lines(experiment.environment_modifications.clone()),
        ),
        (SectionCategory::Harvest, events(EventKind::Harvest)),
        (
            SectionCategory::SimulationControl,
            Component::Record(simulation_record(experiment)),
        ),
    ]
}

fn field_record(experiment: &Experiment, ctx: &WriterContext) -> Fields {
    let fields = &experiment.fields;
    let soil = experiment.soil.as_ref();
    let mut field = Fields::new();

    for key in FIELD_FIELDS {
        copy_field(&mut field, fields, key);
    }

    let has_daily = experiment.weather.as_ref().is_some_and(|w| !w.daily.is_empty());
    let wst_id = match fields.value("dssat_wst_id") {
        Some(id) if !has_daily => Some(id.to_string()),
        _ => experiment
            .weather
            .as_ref()
            .and_then(|w| ctx.weather.file_stem_for(w))
            .map(str::to_string),
    };
    if let Some(wst_id) = wst_id {
        field.insert("wst_id".to_string(), wst_id);
    }

    match soil.filter(|s| s.fields.has("sltx")) {
        Some(soil) => copy_field(&mut field, &soil.fields, "sltx"),
        None => copy_field(&mut field, fields, "sltx"),
    }
    if let Some(soil) = soil {
        copy_field(&mut field, &soil.fields, "sldp");
    }
    copy_field(&mut field, fields, "soil_id");
    for key in FIELD_LOCATION_FIELDS {
        copy_field(&mut field, fields, key);
    }

    // Soil ids carrying a treatment suffix refer to a per-treatment soil analysis copy
    let soil_id = field.value_or("soil_id", "");
    let length = soil_id.chars().count();
    if (length > MAX_SOIL_ID_LEN && SOIL_ID_WITH_TREATMENT.is_match(soil_id)) || length < 8 {
        match soil.map(|s| s.soil_id()).filter(|id| !id.is_empty()) {
            Some(id) => {
                field.insert("soil_id".to_string(), id.to_string());
            }
            None => {
                field.remove("soil_id");
            }
        }
    }
    field
}

fn soil_analysis(experiment: &Experiment) -> LayeredRecord {
    let Some(soil) = &experiment.soil else {
        return LayeredRecord::default();
    };
    if !soil.layers.iter().any(|layer| layer.has("slsc")) {
        return LayeredRecord::default();
    }

    let mut fields = Fields::new();
    copy_field(&mut fields, &soil.fields, "sadat");
    let layers = soil
        .layers
        .iter()
        .map(|layer| {
            let mut record = Fields::new();
            copy_field_as(&mut record, layer, "sabl", "sllb");
            copy_field_as(&mut record, layer, "saoc", "sloc");
            copy_field_as(&mut record, layer, "sasc", "slsc");
            record
        })
        .collect();
    LayeredRecord { fields, layers }
}

fn simulation_record(experiment: &Experiment) -> Fields {
    let mut control = Fields::new();
    for key in SIMULATION_FIELDS {
        copy_field(&mut control, &experiment.simulation_control, key);
    }
    copy_field(&mut control, &experiment.fields, "sdat");
    if let Some(weather) = &experiment.weather {
        copy_field(&mut control, &weather.fields, "co2y");
    }
    if experiment
        .events_of(EventKind::Harvest)
        .any(|e| e.fields.has("date"))
    {
        control.insert("hadat_valid".to_string(), "Y".to_string());
    }
    control
}

// =============================================================================
// Applied DOME info
// =============================================================================

/// DOME ids applied to each treatment, keyed by label in first-seen order
#[derive(Debug, Default)]
struct AppliedDomes {
    entries: Vec<(String, String)>,
    any_applied: bool,
}

impl AppliedDomes {
    fn record(&mut self, trt_name: &str, fields: &Fields) {
        if fields.value("dome_applied") != Some("Y") {
            self.set(trt_name.to_string(), String::new(), true);
            return;
        }
        self.any_applied = true;

        // Seasons of one run share a single `_*` entry, first season wins
        let (label, replace) = match SEASONAL_TREATMENT.captures(trt_name) {
            Some(caps) => (format!("{}_*", &caps[1]), false),
            None => (trt_name.to_string(), true),
        };
        self.set(format!("{} Field    ", label), dome_ids(fields, "field"), replace);
        self.set(format!("{} Seasonal ", label), dome_ids(fields, "seasonal"), replace);
    }

    fn set(&mut self, label: String, ids: String, replace: bool) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) if replace => *existing = ids,
            Some(_) => {}
            None => self.entries.push((label, ids)),
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if !self.any_applied {
            return out;
        }
        push_line(&mut out, "! APPLIED DOME INFO");
        for (label, ids) in self.entries.iter().filter(|(_, ids)| !ids.is_empty()) {
            push_line(&mut out, &format!("! {}\t{}", label, ids));
        }
        out
    }
}

/// Applied ids of the `field` or `seasonal` DOME, failed ones removed
fn dome_ids(fields: &Fields, dome_type: &str) -> String {
    if fields.value(&format!("{}_dome_applied", dome_type)) != Some("Y") {
        return String::new();
    }
    let key = if dome_type == "field" {
        "field_overlay"
    } else {
        "seasonal_strategy"
    };
    let failed = id_set(fields, &format!("{}_dome_failed", dome_type));
    id_set(fields, key)
        .difference(&failed)
        .copied()
        .collect::<Vec<_>>()
        .join("|")
}

fn id_set<'a>(fields: &'a Fields, key: &str) -> BTreeSet<&'a str> {
    fields
        .value_or(key, "")
        .split('|')
        .filter(|id| !id.is_empty())
        .collect()
}

// =============================================================================
// General section
// =============================================================================

fn general_section(
    group: &ExperimentGroup,
    first: &Experiment,
    warnings: &mut WarningLog,
    notes: &mut String,
) -> String {
    let fields = &first.fields;
    let mut out = String::new();

    push_line(
        &mut out,
        &format!(
            "*EXP.DETAILS: {:<10} {}",
            group.display_name(),
            fields.value_or("local_name", DEFAULT_BLANK)
        ),
    );
    out.push_str(LINE_ENDING);
    push_line(&mut out, "*GENERAL");

    if let Some(people) = fields.value("person_notes") {
        push_line(&mut out, "@PEOPLE");
        push_line(&mut out, &format!(" {}", people));
    }
    if let Some(institution) = fields.value("institution") {
        push_line(&mut out, "@ADDRESS");
        push_line(&mut out, &format!(" {}", institution));
    }
    if let Some(site) = fields.value("site_name") {
        push_line(&mut out, "@SITE");
        push_line(&mut out, &format!(" {}", site));
    }

    if PLOT_FIELDS.iter().any(|key| fields.has(key)) {
        push_line(
            &mut out,
            "@ PAREA  PRNO  PLEN  PLDR  PLSP  PLAY HAREA  HRNO  HLEN  HARM.........",
        );
        let mut plan = vec![FieldSpec::number("plta", 6).gap(1)];
        plan.extend(numbers(&["pltr#", "pltln", "pldr", "pltsp"]));
        plan.push(FieldSpec::verbatim("pllay", 5).gap(1));
        plan.extend(numbers(&["pltha", "plth#", "plthl"]));
        plan.push(FieldSpec::verbatim("plthm", 15).gap(1));
        let mut ctx = EncodeContext::new(warnings);
        push_line(&mut out, &encode(fields, &plan, &mut ctx));
    }

    if let Some(text) = fields.value("tr_notes") {
        push_line(notes, "@NOTES");
        let text = text.replace("\\r\\n", LINE_ENDING);
        if text.contains(LINE_ENDING) {
            notes.push_str(&text);
            if !text.ends_with(LINE_ENDING) {
                notes.push_str(LINE_ENDING);
            }
        } else {
            let chars: Vec<char> = text.chars().collect();
            for chunk in chars.chunks(NOTES_WRAP_WIDTH) {
                push_line(notes, &format!(" {}", chunk.iter().collect::<String>()));
            }
        }
    }

    out.push_str(LINE_ENDING);
    out
}

// =============================================================================
// Data sections
// =============================================================================

/// Level-prefixed row rendered through `plan`
fn level_row(
    level: usize,
    record: &Fields,
    plan: &[FieldSpec],
    warnings: &mut WarningLog,
) -> String {
    let mut ctx = EncodeContext::new(warnings);
    format!("{:>2}{}", level, encode(record, plan, &mut ctx))
}

/// Space-led 5-wide numeric columns for `keys`
fn numbers(keys: &[&str]) -> Vec<FieldSpec> {
    keys.iter().map(|key| FieldSpec::number(key, 5).gap(1)).collect()
}

/// Space-led 5-wide columns written as given, right-justified
fn codes(keys: &[&str]) -> Vec<FieldSpec> {
    keys.iter()
        .map(|key| FieldSpec::verbatim(key, 5).right().gap(1))
        .collect()
}

fn event_date() -> FieldSpec {
    FieldSpec::date("date", 5).gap(1)
}

fn cultivar_section(
    index: &SectionIndex,
    warnings: &mut WarningLog,
    notes: &mut String,
    data: &mut String,
) {
    let entries = index.entries(SectionCategory::Cultivar);
    if entries.is_empty() {
        warnings.note("There is no cultivar data in the experiment.");
        return;
    }

    let plan = [
        FieldSpec::text("crid", 2).gap(1).with_default(DEFAULT_BLANK),
        FieldSpec::text("dssat_cul_id", 6).gap(1),
        FieldSpec::verbatim("cul_name", 0).gap(1),
    ];
    let notes_plan = [
        FieldSpec::verbatim("rm", 4).right().gap(1),
        FieldSpec::verbatim("cul_notes", 0).gap(1),
    ];

    push_line(data, "*CULTIVARS");
    push_line(data, "@C CR INGENO CNAME");
    for (idx, entry) in entries.iter().enumerate() {
        let Some(cultivar) = entry.as_record() else {
            continue;
        };
        if !cultivar.has("crid") {
            warnings.missing("crid");
        }
        let mut cultivar = cultivar.clone();
        if let Some(cul_id) = cultivar
            .value("cul_id")
            .filter(|_| !cultivar.has("dssat_cul_id"))
            .map(str::to_string)
        {
            cultivar.insert("dssat_cul_id".to_string(), cul_id);
        }
        push_line(data, &level_row(idx + 1, &cultivar, &plan, warnings));

        if cultivar.has("rm") || cultivar.has("cul_notes") {
            if notes.is_empty() {
                push_line(notes, "@NOTES");
            }
            push_line(notes, " Cultivar Additional Info");
            push_line(notes, " C   RM CNAME            CUL_NOTES");
            push_line(notes, &level_row(idx + 1, &cultivar, &notes_plan, warnings));
        }
    }
    data.push_str(LINE_ENDING);
}

fn field_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    let entries = index.entries(SectionCategory::Field);
    if entries.is_empty() {
        warnings.note("There is no field data in the experiment.");
        return;
    }

    let plan = [
        FieldSpec::text("id_field", 8).gap(1),
        FieldSpec::verbatim("wst_id", 8).gap(1).with_default(DEFAULT_BLANK),
        FieldSpec::text("flsl", 4).right().gap(2),
        FieldSpec::number("flob", 5).gap(1),
        FieldSpec::text("fl_drntype", 5).gap(1),
        FieldSpec::number("fldrd", 5).gap(1),
        FieldSpec::number("fldrs", 5).gap(1),
        FieldSpec::text("flst", 5).gap(1),
        FieldSpec::text("sltx", 5).gap(1),
        FieldSpec::number("sldp", 5),
        FieldSpec::verbatim("soil_id", 10).gap(2),
        FieldSpec::verbatim("fl_name", 0).gap(1),
    ];
    let location_plan = [
        FieldSpec::number("fl_long", 15).gap(1),
        FieldSpec::number("fl_lat", 15).gap(1),
        FieldSpec::number("flele", 9).gap(1),
        FieldSpec::number("farea", 17).gap(1),
        FieldSpec::number("slen", 5).gap(1),
        FieldSpec::number("fllwr", 5).gap(1),
        FieldSpec::number("flsla", 5).gap(1),
        FieldSpec::text("flhst", 5).right().gap(1),
        FieldSpec::number("fhdur", 5).gap(1),
    ];

    push_line(data, "*FIELDS");
    push_line(
        data,
        "@L ID_FIELD WSTA....  FLSA  FLOB  FLDT  FLDD  FLDS  FLST SLTX  SLDP  ID_SOIL    FLNAME",
    );
    let mut second_part = String::new();
    push_line(
        &mut second_part,
        "@L ...........XCRD ...........YCRD .....ELEV .............AREA .SLEN .FLWR .SLAS FLHST FHDUR",
    );

    for (idx, entry) in entries.iter().enumerate() {
        let Some(field) = entry.as_record() else {
            continue;
        };
        if !field.has("wst_id") {
            warnings.missing("wst_id");
        }
        match field.value("soil_id") {
            None => warnings.missing("soil_id"),
            Some(id) if id.chars().count() > MAX_SOIL_ID_LEN => warnings.oversized("soil_id", id),
            Some(_) => {}
        }

        push_line(data, &level_row(idx + 1, field, &plan, warnings));
        push_line(
            &mut second_part,
            &level_row(idx + 1, field, &location_plan, warnings),
        );
    }
    data.push_str(&second_part);
    data.push_str(LINE_ENDING);
}

fn soil_analysis_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    let entries = index.entries(SectionCategory::SoilAnalysis);
    if entries.is_empty() {
        return;
    }

    let mut plan = vec![FieldSpec::date("sadat", 5).gap(1)];
    plan.extend(codes(&["samhb", "sampx", "samke"]));
    plan.push(FieldSpec::verbatim("sa_name", 0).gap(2));
    let layer_plan = numbers(&[
        "sabl", "sabdm", "saoc", "sani", "saphw", "saphb", "sapx", "sake", "sasc",
    ]);

    push_line(data, "*SOIL ANALYSIS");
    for (idx, entry) in entries.iter().enumerate() {
        let Some(analysis) = entry.as_layered() else {
            continue;
        };
        push_line(data, "@A SADAT  SMHB  SMPX  SMKE  SANAME");
        push_line(data, &level_row(idx + 1, &analysis.fields, &plan, warnings));
        if !analysis.layers.is_empty() {
            push_line(data, "@A  SABL  SADM  SAOC  SANI SAPHW SAPHB  SAPX  SAKE  SASC");
        }
        for layer in &analysis.layers {
            push_line(data, &level_row(idx + 1, layer, &layer_plan, warnings));
        }
    }
    data.push_str(LINE_ENDING);
}

fn initial_conditions_section(
    index: &SectionIndex,
    pdate: Option<&str>,
    ctx: &WriterContext,
    warnings: &mut WarningLog,
    data: &mut String,
) {
    let entries = index.entries(SectionCategory::InitialConditions);
    if entries.is_empty() {
        return;
    }

    let mut plan = vec![
        FieldSpec::verbatim("icpcr", 5).right().gap(1),
        FieldSpec::date("icdat", 5).gap(1),
    ];
    plan.extend(numbers(&[
        "icrt", "icnd", "icrz#", "icrze", "icwt", "icrag", "icrn", "icrp", "icrip", "icrdp",
    ]));
    plan.push(FieldSpec::verbatim("ic_name", 0).gap(1));
    let layer_plan = numbers(&["icbl", "ich2o", "icnh4", "icno3"]);

    push_line(data, "*INITIAL CONDITIONS");
    for (idx, entry) in entries.iter().enumerate() {
        let Some(initial) = entry.as_layered() else {
            continue;
        };
        let mut fields = initial.fields.clone();
        if let Some(crid) = fields.value("icpcr") {
            let crid = ctx.crops.to_two_char(crid);
            fields.insert("icpcr".to_string(), crid);
        }
        if let Some(pdate) = pdate.filter(|_| !fields.has("icdat")) {
            fields.insert("icdat".to_string(), pdate.to_string());
        }

        push_line(
            data,
            "@C   PCR ICDAT  ICRT  ICND  ICRN  ICRE  ICWD ICRES ICREN ICREP ICRIP ICRID ICNAME",
        );
        push_line(data, &level_row(idx + 1, &fields, &plan, warnings));

        if !initial.layers.is_empty() {
            push_line(data, "@C  ICBL  SH2O  SNH4  SNO3");
        }
        for layer in &initial.layers {
            push_line(data, &level_row(idx + 1, layer, &layer_plan, warnings));
        }
    }
    data.push_str(LINE_ENDING);
}

/// Planting depth is carried in mm and written in cm
fn depth_in_cm(pldp: &str) -> Option<String> {
    let millimetres: f64 = pldp.trim().parse().ok()?;
    Some((millimetres / 10.0).to_string())
}

fn planting_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    let entries = index.entries(SectionCategory::Planting);
    if entries.is_empty() {
        warnings.note("There is no planting data in the experiment.");
        return;
    }

    push_line(data, "*PLANTING DETAILS");
    push_line(
        data,
        "@P PDATE EDATE  PPOP  PPOE  PLME  PLDS  PLRS  PLRD  PLDP  PLWT  PAGE  PENV  PLPH  SPRL                        PLNAME",
    );
    for (idx, entry) in entries.iter().enumerate() {
        let Some(planting) = entry.as_record() else {
            continue;
        };
        let mut planting = planting.clone();

        let pdate = match planting.value("date") {
            None => {
                warnings.missing("pdate");
                DEFAULT_VALUE.to_string()
            }
            Some(value) => to_doy(value).unwrap_or_else(|| {
                warnings.note(&format!(
                    "Incompleted record because variable [pdate] with invalid value [{}]",
                    value
                ));
                DEFAULT_VALUE.to_string()
            }),
        };
        planting.insert("date".to_string(), pdate);
        if !planting.has("plpop") && !planting.has("plpoe") {
            warnings.note("Incompleted record because missing data : [plpop] and [plpoe]");
        }
        if !planting.has("plrs") {
            warnings.missing("plrs");
        }
        if let Some(depth) = planting.value("pldp").and_then(depth_in_cm) {
            planting.insert("pldp".to_string(), depth);
        }

        // Each population column falls back to the other
        let plpop_default = planting.value_or("plpoe", DEFAULT_VALUE);
        let plpoe_default = planting.value_or("plpop", DEFAULT_VALUE);
        let mut plan = vec![
            FieldSpec::verbatim("date", 5).right().gap(1),
            FieldSpec::date("edate", 5).gap(1),
            FieldSpec::number("plpop", 5).gap(1).with_default(plpop_default),
            FieldSpec::number("plpoe", 5).gap(1).with_default(plpoe_default),
        ];
        plan.extend(codes(&["plma", "plds"]));
        plan.extend(numbers(&[
            "plrs", "plrd", "pldp", "plmwt", "page", "plenv", "plph", "plspl",
        ]));
        plan.push(FieldSpec::verbatim("pl_name", 0).gap(24));

        push_line(data, &level_row(idx + 1, &planting, &plan, warnings));
    }
    data.push_str(LINE_ENDING);
}

fn irrigation_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    let entries = index.entries(SectionCategory::Irrigation);
    if entries.is_empty() {
        return;
    }

    let mut plan = numbers(&["ireff", "irmdp", "irthr", "irept"]);
    plan.extend(codes(&["irstg", "iame"]));
    plan.push(FieldSpec::number("iamt", 5).gap(1));
    plan.push(FieldSpec::verbatim("ir_name", 0).gap(1));
    let event_plan = [
        event_date(),
        FieldSpec::verbatim("irop", 5).gap(1),
        FieldSpec::number("irval", 5).gap(1),
    ];

    push_line(data, "*IRRIGATION AND WATER MANAGEMENT");
    let blank = Fields::new();
    for (idx, entry) in entries.iter().enumerate() {
        let events = entry.as_events();
        let first = events.first().map(|e| &e.fields).unwrap_or(&blank);
        push_line(data, "@I  EFIR  IDEP  ITHR  IEPT  IOFF  IAME  IAMT IRNAME");
        push_line(data, &level_row(idx + 1, first, &plan, warnings));

        if !events.is_empty() {
            push_line(data, "@I IDATE  IROP IRVAL");
        }
        for event in events {
            push_line(data, &level_row(idx + 1, &event.fields, &event_plan, warnings));
        }
    }
    data.push_str(LINE_ENDING);
}

/// Event rows of every entry of `category`, one line per event
fn event_rows(
    index: &SectionIndex,
    category: SectionCategory,
    plan: &[FieldSpec],
    warnings: &mut WarningLog,
    data: &mut String,
) {
    for (idx, entry) in index.entries(category).iter().enumerate() {
        for event in entry.as_events() {
            push_line(data, &level_row(idx + 1, &event.fields, plan, warnings));
        }
    }
    data.push_str(LINE_ENDING);
}

fn fertilizer_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    if index.entries(SectionCategory::Fertilizer).is_empty() {
        return;
    }

    let mut plan = vec![event_date()];
    plan.extend(codes(&["fecd", "feacd"]));
    plan.extend(numbers(&["fedep", "feamn", "feamp", "feamk", "feamc", "feamo"]));
    plan.extend(codes(&["feocd"]));
    plan.push(FieldSpec::verbatim("fe_name", 0).gap(1));

    push_line(data, "*FERTILIZERS (INORGANIC)");
    push_line(
        data,
        "@F FDATE  FMCD  FACD  FDEP  FAMN  FAMP  FAMK  FAMC  FAMO  FOCD FERNAME",
    );
    event_rows(index, SectionCategory::Fertilizer, &plan, warnings, data);
}

fn organic_matter_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    if index.entries(SectionCategory::OrganicMatter).is_empty() {
        return;
    }

    let mut plan = vec![event_date(), FieldSpec::verbatim("omcd", 5).gap(1)];
    plan.extend(numbers(&["omamt", "omn%", "omp%", "omk%", "ominp", "omdep"]));
    plan.extend(codes(&["omacd"]));
    plan.push(FieldSpec::verbatim("om_name", 0).gap(1));

    push_line(data, "*RESIDUES AND ORGANIC FERTILIZER");
    push_line(
        data,
        "@R RDATE  RCOD  RAMT  RESN  RESP  RESK  RINP  RDEP  RMET RENAME",
    );
    event_rows(index, SectionCategory::OrganicMatter, &plan, warnings, data);
}

fn chemical_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    if index.entries(SectionCategory::Chemical).is_empty() {
        return;
    }

    let mut plan = vec![event_date()];
    plan.extend(codes(&["chcd"]));
    plan.push(FieldSpec::number("chamt", 5).gap(1));
    plan.extend(codes(&["chacd", "chdep", "ch_targets"]));
    plan.push(FieldSpec::verbatim("ch_name", 0).gap(2));

    push_line(data, "*CHEMICAL APPLICATIONS");
    push_line(data, "@C CDATE CHCOD CHAMT  CHME CHDEP   CHT..CHNAME");
    event_rows(index, SectionCategory::Chemical, &plan, warnings, data);
}

fn tillage_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    if index.entries(SectionCategory::Tillage).is_empty() {
        return;
    }

    let mut plan = vec![event_date()];
    plan.extend(codes(&["tiimp"]));
    plan.push(FieldSpec::number("tidep", 5).gap(1));
    plan.push(FieldSpec::verbatim("ti_name", 0).gap(1));

    push_line(data, "*TILLAGE AND ROTATIONS");
    push_line(data, "@T TDATE TIMPL  TDEP TNAME");
    event_rows(index, SectionCategory::Tillage, &plan, warnings, data);
}

fn environment_section(index: &SectionIndex, data: &mut String) {
    let entries = index.entries(SectionCategory::EnvironmentModification);
    if entries.is_empty() {
        return;
    }

    push_line(data, "*ENVIRONMENT MODIFICATIONS");
    push_line(
        data,
        "@E ODATE EDAY  ERAD  EMAX  EMIN  ERAIN ECO2  EDEW  EWIND ENVNAME",
    );
    for (idx, entry) in entries.iter().enumerate() {
        for line in entry.as_lines() {
            push_line(data, &format!("{:>2}{}", idx + 1, line));
        }
    }
    data.push_str(LINE_ENDING);
}

fn harvest_section(index: &SectionIndex, warnings: &mut WarningLog, data: &mut String) {
    if index.entries(SectionCategory::Harvest).is_empty() {
        return;
    }

    let mut plan = vec![event_date()];
    plan.extend(
        ["hastg", "hacom", "hasiz"]
            .iter()
            .map(|key| FieldSpec::verbatim(key, 5).gap(1)),
    );
    plan.extend(numbers(&["hap%", "hab%"]));
    plan.push(FieldSpec::verbatim("ha_name", 0).gap(1));

    push_line(data, "*HARVEST DETAILS");
    push_line(data, "@H HDATE  HSTG  HCOM HSIZE   HPC  HBPC HNAME");
    event_rows(index, SectionCategory::Harvest, &plan, warnings, data);
}

// =============================================================================
// Simulation controls
// =============================================================================

/// Overwrite `line` with `value` starting at character `start`, padding as needed
pub(crate) fn splice_at(line: &str, value: &str, start: usize) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    let end = start + value.chars().count();
    if chars.len() < end {
        chars.resize(end, ' ');
    }
    chars.splice(start..end, value.chars());
    chars.into_iter().collect()
}

/// Header line followed by the level-prefixed control line
fn push_control(out: &mut String, level: &str, header: &str, line: &str) {
    push_line(out, header);
    push_line(out, &format!("{} {}", level, line));
}

/// Simulation control and automatic management block for level `level`
fn simulation_block(level: usize, control: &Fields) -> String {
    let sm = format!("{:>2}", level);
    let mut out = String::new();

    let co2 = match control.value("co2y") {
        Some(co2y) if !co2y.starts_with('-') => "W",
        _ => "M",
    };
    let harvest_option = if control.has("hadat_valid") { "R" } else { "M" };
    let start = control
        .value("sdat")
        .and_then(to_doy)
        .unwrap_or_else(|| DEFAULT_VALUE.to_string());
    let start = format!("{:>5}", start);

    let general = match control.value("sm_general") {
        Some(line) if start.trim() != DEFAULT_VALUE => splice_at(line, &start, 30),
        Some(line) => line.to_string(),
        None => format!("GE              1     1     S {}  2150 DEFAULT SIMULATION CONTROL", start),
    };
    let options = match control.value("sm_options") {
        Some(line) => splice_at(line, co2, 64),
        None => format!("OP              Y     Y     Y     N     N     N     N     Y     {}", co2),
    };
    let management = match control.value("sm_management") {
        Some(line) => splice_at(line, harvest_option, 40),
        None => format!("MA              R     R     R     R     {}", harvest_option),
    };

    push_control(
        &mut out,
        &sm,
        "@N GENERAL     NYERS NREPS START SDATE RSEED SNAME....................",
        &general,
    );
    push_control(
        &mut out,
        &sm,
        "@N OPTIONS     WATER NITRO SYMBI PHOSP POTAS DISES  CHEM  TILL   CO2",
        &options,
    );
    push_control(
        &mut out,
        &sm,
        "@N METHODS     WTHER INCON LIGHT EVAPO INFIL PHOTO HYDRO NSWIT MESOM MESEV MESOL",
        control.value_or(
            "sm_methods",
            "ME              M     M     E     R     S     L     R     1     P     S     2",
        ),
    );
    push_control(
        &mut out,
        &sm,
        "@N MANAGEMENT  PLANT IRRIG FERTI RESID HARVS",
        &management,
    );
    push_control(
        &mut out,
        &sm,
        "@N OUTPUTS     FNAME OVVEW SUMRY FROPT GROUT CAOUT WAOUT NIOUT MIOUT DIOUT VBOSE CHOUT OPOUT",
        control.value_or(
            "sm_outputs",
            "OU              N     Y     Y     1     Y     Y     N     N     N     N     N     N     N",
        ),
    );
    out.push_str(LINE_ENDING);

    push_line(&mut out, "@  AUTOMATIC MANAGEMENT");
    let automatic = [
        (
            "@N PLANTING    PFRST PLAST PH2OL PH2OU PH2OD PSTMX PSTMN",
            "sm_planting",
            "PL          82050 82064    40   100    30    40    10",
        ),
        (
            "@N IRRIGATION  IMDEP ITHRL ITHRU IROFF IMETH IRAMT IREFF",
            "sm_irrigation",
            "IR             30    50   100 GS000 IR001    10  1.00",
        ),
        (
            "@N NITROGEN    NMDEP NMTHR NAMNT NCODE NAOFF",
            "sm_nitrogen",
            "NI             30    50    25 FE001 GS000",
        ),
        (
            "@N RESIDUES    RIPCN RTIME RIDEP",
            "sm_residues",
            "RE            100     1    20",
        ),
        (
            "@N HARVEST     HFRST HLAST HPCNP HPCNR",
            "sm_harvests",
            "HA              0 83057   100     0",
        ),
    ];
    for (header, key, default) in automatic {
        push_control(&mut out, &sm, header, control.value_or(key, default));
    }
    out.push_str(LINE_ENDING);
    out
}
