//! Soil (`.SOL`) writer

use super::{RenderedFile, WriterContext, push_line};
use crate::app::models::{FieldsExt, Soil};
use crate::app::services::fixed_width::{EncodeContext, FieldSpec, WarningLog, encode};
use crate::app::services::grouping::SoilGroup;
use crate::constants::{DEFAULT_BLANK, LINE_ENDING, MAX_SOIL_ID_LEN};
use tracing::debug;

const LAYER_NUMBERS: &[&str] = &[
    "slll", "sldul", "slsat", "slrgf", "sksat", "slbdm", "sloc", "slcly", "slsil", "slcf", "slni",
    "slphw", "slphb", "slcec", "sladc",
];

const CHEMISTRY_FIELDS: &[&str] = &[
    "slpx", "slpt", "slpo", "caco3", "slal", "slfe", "slmn", "slbs", "slpa", "slpb", "slke",
    "slmg", "slna", "slsu", "slec", "slca",
];

/// Render the soil file of `group`
pub fn render_soil_file(group: &SoilGroup, ctx: &WriterContext) -> Option<RenderedFile> {
    if group.soils.is_empty() {
        return None;
    }

    let mut title = String::new();
    push_line(
        &mut title,
        &format!(
            "!This soil file is created by DSSAT translator tool on {}.",
            ctx.generated_at
        ),
    );
    title.push_str("*SOILS: ");

    let mut sites = String::new();
    for soil in &group.soils {
        if let Some(notes) = soil.fields.value("sl_notes") {
            title.push_str(notes);
            title.push_str("; ");
        }
        sites.push_str(&render_site(group, soil));
    }
    title.push_str(LINE_ENDING);
    title.push_str(LINE_ENDING);

    debug!(
        "Rendered {} soil sites into {}",
        group.soils.len(),
        group.file_name()
    );
    Some(RenderedFile::new(group.file_name(), title + &sites))
}

/// One soil site with its own warning block
fn render_site(group: &SoilGroup, soil: &Soil) -> String {
    let site = &soil.fields;
    let mut warnings = WarningLog::new();
    let mut data = String::new();

    push_line(
        &mut data,
        &format!("!The ACE ID is {}.", site.value_or("sid", "N/A")),
    );
    push_line(
        &mut data,
        &format!(
            "!This soil data is used for the experiment of {}.",
            group.experiments_for(soil.soil_id()).unwrap_or("N/A")
        ),
    );
    push_line(&mut data, "!");

    let soil_id = soil.soil_id();
    if soil_id.is_empty() {
        warnings.missing("soil_id");
    } else if soil_id.chars().count() > MAX_SOIL_ID_LEN {
        warnings.oversized("soil_id", soil_id);
    }

    let mut site = site.clone();
    site.insert("soil_id".to_string(), soil_id.to_string());
    let mut ctx = EncodeContext::new(&mut warnings);

    let title_plan = [
        FieldSpec::verbatim("soil_id", 10).with_default(DEFAULT_BLANK),
        FieldSpec::text("sl_source", 11).gap(2),
        FieldSpec::text("sltx", 5).gap(1),
        FieldSpec::number("sldp", 5).gap(1),
        FieldSpec::verbatim("soil_name", 0).gap(1),
    ];
    push_line(&mut data, &format!("*{}", encode(&site, &title_plan, &mut ctx)));

    let location_plan = [
        FieldSpec::text("sl_loc_3", 11).gap(1),
        FieldSpec::text("sl_loc_1", 11).gap(1),
        FieldSpec::number("soil_lat", 8).gap(2),
        FieldSpec::number("soil_long", 8),
        FieldSpec::verbatim("classification", 0).gap(1),
    ];
    push_line(&mut data, "@SITE        COUNTRY          LAT     LONG SCS FAMILY");
    push_line(&mut data, &encode(&site, &location_plan, &mut ctx));

    let mut surface_plan = vec![FieldSpec::verbatim("sscol", 5).right().gap(1)];
    surface_plan.extend(number_plan(&["salb", "slu1", "sldr", "slro", "slnf", "slpf"]));
    surface_plan.extend(
        ["smhb", "smpx", "smke"]
            .iter()
            .map(|key| FieldSpec::verbatim(key, 5).right().gap(1)),
    );
    push_line(
        &mut data,
        "@ SCOM  SALB  SLU1  SLDR  SLRO  SLNF  SLPF  SMHB  SMPX  SMKE",
    );
    push_line(&mut data, &encode(&site, &surface_plan, &mut ctx));

    push_line(
        &mut data,
        "@  SLB  SLMH  SLLL  SDUL  SSAT  SRGF  SSKS  SBDM  SLOC  SLCL  SLSI  SLCF  SLNI  SLHW  SLHB  SCEC  SADC",
    );
    let mut chemistry = String::new();
    push_line(
        &mut chemistry,
        "@  SLB  SLPX  SLPT  SLPO CACO3  SLAL  SLFE  SLMN  SLBS  SLPA  SLPB  SLKE  SLMG  SLNA  SLSU  SLEC  SLCA",
    );
    let mut has_chemistry = false;
    let depth_plan = number_plan(&["sllb"]);
    let mut layer_plan = vec![FieldSpec::verbatim("slmh", 5).right().gap(1)];
    layer_plan.extend(number_plan(LAYER_NUMBERS));
    let chemistry_plan = number_plan(CHEMISTRY_FIELDS);

    for layer in &soil.layers {
        let depth = encode(layer, &depth_plan, &mut ctx);
        push_line(&mut data, &(depth.clone() + &encode(layer, &layer_plan, &mut ctx)));

        has_chemistry |= CHEMISTRY_FIELDS.iter().any(|key| layer.has(key));
        push_line(&mut chemistry, &(depth + &encode(layer, &chemistry_plan, &mut ctx)));
    }

    if has_chemistry {
        data.push_str(&chemistry);
    }
    data.push_str(LINE_ENDING);

    let mut out = warnings.render();
    out.push_str(&data);
    out
}

/// Space-led 5-wide numeric columns for `keys`
fn number_plan(keys: &[&str]) -> Vec<FieldSpec> {
    keys.iter().map(|key| FieldSpec::number(key, 5).gap(1)).collect()
}
