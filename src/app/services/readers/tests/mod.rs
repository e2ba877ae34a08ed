//! Test fixtures for the DSSAT readers

mod observed_tests;

/// Join lines with the DSSAT line terminator
pub fn dssat_text(lines: &[&str]) -> String {
    lines.join("\r\n")
}

/// Weather file for one station with the given daily lines
pub fn weather_file(insi: &str, daily: &[&str]) -> String {
    let station = format!(
        "{:>6}   29.630  -82.370    40  21.4  13.6 -99.0 -99.0",
        insi
    );
    let mut lines = vec![
        "*WEATHER DATA : Gainesville, Florida",
        "",
        "@ INSI      LAT     LONG  ELEV   TAV   AMP REFHT WNDHT",
        station.as_str(),
        "",
        "@DATE  SRAD  TMAX  TMIN  RAIN",
    ];
    lines.extend_from_slice(daily);
    dssat_text(&lines)
}

pub fn soil_file() -> String {
    dssat_text(&[
        "*SOILS: General DSSAT Soil Input File",
        "",
        "*IBMZ910014  SCS         SL     180 Millhopper Fine Sand",
        "@SITE        COUNTRY          LAT     LONG SCS FAMILY",
        " Gainesville USA            29.630 -82.370 Loamy,silic,hyperth Arenic Paleudult",
        "@ SCOM  SALB  SLU1  SLDR  SLRO  SLNF  SLPF  SMHB  SMPX  SMKE",
        "   -99  0.18   2.0  0.65  60.0  1.00  0.92 IB001 IB001 IB001",
        "@  SLB  SLMH  SLLL  SDUL  SSAT  SRGF  SSKS  SBDM  SLOC  SLCL  SLSI  SLCF  SLNI  SLHW  SLHB  SCEC  SADC",
        "     5   -99 0.026 0.096 0.345 1.000  7.40  1.66  0.67   1.7   0.9",
        "    15   -99 0.025 0.105 0.345 1.000  7.40  1.66  0.67   1.7   0.9",
        "@  SLB  SLPX  SLPT  SLPO CACO3  SLAL  SLFE  SLMN  SLBS  SLPA  SLPB  SLKE  SLMG  SLNA  SLSU  SLEC  SLCA",
        "     5  12.0   -99   -99   1.5",
        "    30   4.0",
        "",
        "*IBMZ910015  SCS         S      150 Second site",
        "@  SLB  SLMH  SLLL  SDUL  SSAT  SRGF  SSKS  SBDM  SLOC  SLCL  SLSI  SLCF  SLNI  SLHW  SLHB  SCEC  SADC",
        "    10   -99 0.030",
    ])
}

pub fn observed_file() -> String {
    dssat_text(&[
        "*EXP.DATA (A): UFGA8201MZ N-FERTILIZER X IRRIGATION",
        "",
        "@TRNO  HWAM  MDAT  ADAT",
        "     1  8000 82130 82070",
        "     2  9000 82131   -99",
        "        7000",
        "@TRNO  CWAM",
        "     1 12000",
    ])
}
