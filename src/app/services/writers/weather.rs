//! Weather station (`.WTH`) writer

use super::{RenderedFile, WriterContext, push_line};
use crate::app::models::{FieldsExt, Weather};
use crate::app::services::fixed_width::{EncodeContext, FieldSpec, WarningLog, encode};
use crate::constants::{DEFAULT_BLANK, LINE_ENDING};
use std::collections::BTreeSet;
use tracing::debug;

/// Daily variables with their column titles, in output order
const DAILY_COLUMNS: &[(&str, &str)] = &[
    ("srad", "SRAD"),
    ("tmax", "TMAX"),
    ("tmin", "TMIN"),
    ("rain", "RAIN"),
    ("tdew", "DEWP"),
    ("wind", "WIND"),
    ("pard", "PAR"),
    ("evap", "EVAP"),
    ("rhumd", "RHUM"),
    ("vprsd", "VPRS"),
];

const DATE_FIELD: &str = "w_date";

/// Daily columns present in `weather`: known variables first, then the rest by name
fn daily_columns(weather: &Weather) -> Vec<(String, String)> {
    let present: BTreeSet<&str> = weather
        .daily
        .iter()
        .flat_map(|day| day.keys())
        .filter(|key| key.as_str() != DATE_FIELD)
        .map(String::as_str)
        .collect();

    let mut columns: Vec<(String, String)> = DAILY_COLUMNS
        .iter()
        .filter(|(key, _)| present.contains(key))
        .map(|(key, title)| (key.to_string(), title.to_string()))
        .collect();
    columns.extend(
        present
            .iter()
            .filter(|key| !DAILY_COLUMNS.iter().any(|(known, _)| known == *key))
            .map(|key| (key.to_string(), key.to_uppercase())),
    );
    columns
}

/// Render station `weather` as `<name>.WTH`
pub fn render_weather_file(name: &str, weather: &Weather, _ctx: &WriterContext) -> Option<RenderedFile> {
    if weather.fields.is_empty() && weather.daily.is_empty() {
        return None;
    }

    let station = &weather.fields;
    let mut warnings = WarningLog::new();
    let mut data = String::new();

    push_line(
        &mut data,
        &format!(
            "*WEATHER DATA : {}",
            station.value_or("wst_notes", DEFAULT_BLANK)
        ),
    );
    data.push_str(LINE_ENDING);

    let mut station = station.clone();
    if !station.has("dssat_insi") {
        let insi: String = name.chars().take(4).collect();
        station.insert("dssat_insi".to_string(), insi);
    }
    let mut header = "@ INSI      LAT     LONG  ELEV   TAV   AMP REFHT WNDHT".to_string();
    let mut plan = vec![
        FieldSpec::verbatim("dssat_insi", 4).right().gap(2),
        FieldSpec::number("wst_lat", 8).gap(1),
        FieldSpec::number("wst_long", 8).gap(1),
    ];
    plan.extend(
        ["wst_elev", "tav", "tamp", "refht", "wndht"]
            .iter()
            .map(|key| FieldSpec::number(key, 5).gap(1)),
    );
    if station.has("co2y") {
        header.push_str("  CCO2");
        plan.push(FieldSpec::number("co2y", 5).gap(1));
    }
    push_line(&mut data, &header);
    let mut ctx = EncodeContext::new(&mut warnings);
    push_line(&mut data, &encode(&station, &plan, &mut ctx));
    data.push_str(LINE_ENDING);

    let columns = daily_columns(weather);
    let titles: String = columns
        .iter()
        .map(|(_, title)| format!("{:>6}", title))
        .collect();
    push_line(&mut data, &format!("@DATE{}", titles));
    let mut daily_plan = vec![FieldSpec::date(DATE_FIELD, 5)];
    daily_plan.extend(columns.iter().map(|(key, _)| FieldSpec::number(key, 5).gap(1)));
    for day in &weather.daily {
        push_line(&mut data, &encode(day, &daily_plan, &mut ctx));
    }

    debug!(
        "Rendered weather station {} with {} days",
        name,
        weather.daily.len()
    );

    let mut content = warnings.render();
    content.push_str(&data);
    Some(RenderedFile::new(format!("{}.WTH", name), content))
}
