//! Test builders for the DSSAT writers

use super::WriterContext;
use crate::app::models::{Event, EventKind, Experiment, Fields};
use crate::app::services::fixed_width::YearPivot;
use crate::app::services::grouping::{ExperimentGroup, WeatherCatalog, group_experiments};
use crate::app::services::lookup::CropCodes;
use std::sync::Arc;


pub const GENERATED_AT: &str = "Mon Jan 01 00:00:00 2024";

pub fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Writer context with a fixed timestamp and no weather stations
pub fn context() -> WriterContext {
    WriterContext::new(
        Arc::new(CropCodes::new()),
        Arc::new(WeatherCatalog::default()),
        YearPivot::new(15),
    )
    .with_generated_at(GENERATED_AT)
}

/// Maize treatment planted on 1982-02-26 in field UFGA0001
pub fn experiment(exname: &str, trt_name: &str) -> Experiment {
    Experiment {
        fields: fields(&[
            ("exname", exname),
            ("trt_name", trt_name),
            ("crid", "MAZ"),
            ("local_name", "N-FERTILIZER X IRRIGATION"),
            ("id_field", "UFGA0001"),
            ("soil_id", "IBMZ910014"),
        ]),
        events: vec![Event::new(
            EventKind::Planting,
            fields(&[
                ("date", "19820226"),
                ("crid", "MAZ"),
                ("cul_id", "IB0035"),
                ("cul_name", "McCurdy 84aa"),
                ("plpop", "7.2"),
                ("plpoe", "7.2"),
                ("plrs", "61"),
                ("pldp", "50"),
            ]),
        )],
        ..Default::default()
    }
}

pub fn fertilizer(date: &str) -> Event {
    Event::new(
        EventKind::Fertilizer,
        fields(&[
            ("date", date),
            ("fecd", "FE001"),
            ("feacd", "AP002"),
            ("fedep", "10"),
            ("feamn", "27"),
        ]),
    )
}

/// The single group formed by `experiments`
pub fn group(experiments: Vec<Experiment>) -> ExperimentGroup {
    group_experiments(&experiments, &CropCodes::new())
        .into_iter()
        .next()
        .expect("experiments form one group")
}

/// Lines of a rendered file without terminators
pub fn lines(content: &str) -> Vec<&str> {
    content.split("\r\n").collect()
}
