//! Test fixtures for the translation entry points

use super::InputBundle;
use crate::constants::file_kinds;

mod output_tests;

fn dssat_text(lines: &[&str]) -> String {
    lines.join("\r\n")
}

pub fn weather_text() -> String {
    dssat_text(&[
        "*WEATHER DATA : Gainesville, Florida",
        "",
        "@ INSI      LAT     LONG  ELEV   TAV   AMP REFHT WNDHT",
        "  UFGA   29.630  -82.370    40  21.4  13.6 -99.0 -99.0",
        "",
        "@DATE  SRAD  TMAX  TMIN  RAIN",
        "82001  12.1  24.4  10.6   1.2",
        "82002  13.0  25.0   9.8   0.0",
    ])
}

pub fn soil_text() -> String {
    dssat_text(&[
        "*SOILS: General DSSAT Soil Input File",
        "",
        "*IBMZ910014  SCS         SL     180 Millhopper Fine Sand",
        "@SITE        COUNTRY          LAT     LONG SCS FAMILY",
        " Gainesville USA            29.630 -82.370 Loamy,silic,hyperth Arenic Paleudult",
        "@  SLB  SLMH  SLLL  SDUL  SSAT  SRGF  SSKS  SBDM  SLOC  SLCL  SLSI  SLCF  SLNI  SLHW  SLHB  SCEC  SADC",
        "     5   -99 0.026 0.096 0.345 1.000  7.40  1.66  0.67   1.7   0.9",
        "    15   -99 0.025 0.105 0.345 1.000  7.40  1.66  0.67   1.7   0.9",
    ])
}

pub fn observed_text() -> String {
    dssat_text(&[
        "*EXP.DATA (A): UFGA8201MZ N-FERTILIZER X IRRIGATION",
        "",
        "@TRNO  HWAM  MDAT  ADAT  CWAM",
        "     1  8000 82130 82070 12000",
        "     2  9000 82131 82071 13000",
    ])
}

/// Bundle holding one weather, one soil and one observed file
pub fn full_bundle() -> InputBundle {
    InputBundle::new()
        .with_file(file_kinds::WEATHER, "UFGA8201.WTH", weather_text())
        .with_file(file_kinds::SOIL, "IB.SOL", soil_text())
        .with_file(file_kinds::OBSERVED, "UFGA8201.MZA", observed_text())
}
