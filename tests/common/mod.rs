//! Shared dataset builders for the integration tests

#![allow(dead_code)]

use dssat_translator::app::models::{CultivarRecord, ObservedData};
use dssat_translator::{Dataset, Event, EventKind, Experiment, Fields, Soil, Weather};

pub fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn station() -> Weather {
    Weather {
        fields: fields(&[
            ("wst_id", "UFGA"),
            ("wst_notes", "Gainesville, Florida"),
            ("dssat_insi", "UFGA"),
            ("wst_lat", "29.630"),
            ("wst_long", "-82.370"),
            ("wst_elev", "40"),
            ("tav", "21.4"),
            ("tamp", "13.6"),
        ]),
        daily: vec![
            fields(&[
                ("w_date", "19820101"),
                ("srad", "12.1"),
                ("tmax", "24.4"),
                ("tmin", "10.6"),
                ("rain", "1.2"),
            ]),
            fields(&[
                ("w_date", "19820102"),
                ("srad", "13.0"),
                ("tmax", "25.0"),
                ("tmin", "9.8"),
                ("rain", "0.0"),
            ]),
        ],
    }
}

pub fn profile() -> Soil {
    Soil {
        fields: fields(&[
            ("soil_id", "IBMZ910014"),
            ("sl_source", "SCS"),
            ("sltx", "SL"),
            ("sldp", "180"),
            ("soil_name", "Millhopper Fine Sand"),
            ("sl_notes", "Florida profiles"),
            ("sl_loc_3", "Gainesville"),
            ("sl_loc_1", "USA"),
            ("soil_lat", "29.630"),
            ("soil_long", "-82.370"),
            ("salb", "0.18"),
        ]),
        layers: vec![
            fields(&[("sllb", "5"), ("slll", "0.026"), ("sldul", "0.096")]),
            fields(&[("sllb", "15"), ("slll", "0.025"), ("sldul", "0.105")]),
        ],
    }
}

/// Maize treatment with linked soil, weather, observations and cultivar
pub fn treatment(number: u32, fertilizer_date: &str) -> Experiment {
    let exname = format!("UFGA8201MZ_{}", number);
    let trt_name = format!("Treatment {}", number);
    let yield_kg = format!("{}000", 7 + number);
    Experiment {
        fields: fields(&[
            ("exname", exname.as_str()),
            ("trt_name", trt_name.as_str()),
            ("crid", "MAZ"),
            ("local_name", "N-FERTILIZER X IRRIGATION"),
            ("id_field", "UFGA0001"),
            ("soil_id", "IBMZ910014"),
        ]),
        events: vec![
            Event::new(
                EventKind::Planting,
                fields(&[
                    ("date", "19820226"),
                    ("crid", "MAZ"),
                    ("cul_id", "IB0035"),
                    ("cul_name", "McCurdy 84aa"),
                    ("plpop", "7.2"),
                    ("plrs", "61"),
                ]),
            ),
            Event::new(
                EventKind::Fertilizer,
                fields(&[
                    ("date", fertilizer_date),
                    ("fecd", "FE001"),
                    ("feamn", "27"),
                ]),
            ),
        ],
        soil: Some(profile()),
        weather: Some(station()),
        observed: ObservedData {
            summary: fields(&[
                ("hwam", yield_kg.as_str()),
                ("mdat", "19820510"),
                ("adat", "19820311"),
                ("cwam", "12000"),
            ]),
            time_series: vec![fields(&[("date", "19820301"), ("lai", "0.8")])],
        },
        cultivar_records: vec![CultivarRecord {
            header_info: "*MAIZE CULTIVAR COEFFICIENTS".to_string(),
            cul_titles: "@VAR#  VRNAME.......... EXPNO   ECO#    P1    P2".to_string(),
            cul_info: "IB0035 McCurdy 84aa         . IB0001 265.0 0.300".to_string(),
        }],
        ..Default::default()
    }
}

pub fn dataset() -> Dataset {
    Dataset {
        experiments: vec![treatment(1, "19820301"), treatment(2, "19820315")],
        ..Default::default()
    }
}
