//! Static DSSAT code tables
//!
//! Crop identifiers exist in a 3-character form (data model) and a
//! 2-character form (DSSAT file names and batch files). The table is built
//! once and shared read-only; lookups never fail and return the key unchanged
//! when it is unknown.

use std::collections::HashMap;

/// (3-character id, 2-character id, crop name)
const CROPS: &[(&str, &str, &str)] = &[
    ("MAZ", "MZ", "Maize"),
    ("WHT", "WH", "Wheat"),
    ("RIC", "RI", "Rice"),
    ("SOY", "SB", "Soybean"),
    ("PNT", "PN", "Peanut"),
    ("SGH", "SG", "Sorghum"),
    ("MIL", "ML", "Millet"),
    ("BAR", "BA", "Barley"),
    ("POT", "PT", "Potato"),
    ("CSV", "CS", "Cassava"),
    ("COT", "CO", "Cotton"),
    ("DRB", "BN", "Drybean"),
    ("CHP", "CH", "Chickpea"),
    ("CWP", "CP", "Cowpea"),
    ("SUN", "SU", "Sunflower"),
    ("SUC", "SC", "Sugarcane"),
    ("TOM", "TM", "Tomato"),
    ("FAL", "FA", "Fallow"),
    ("SWC", "SW", "SweetCorn"),
    ("CBG", "CB", "Cabbage"),
    ("PEP", "PR", "Pepper"),
    ("FBN", "FB", "FabaBean"),
    ("TAR", "TR", "Taro"),
    ("TNR", "TN", "Tanier"),
    ("VBN", "VB", "Velvetbean"),
    ("PIA", "PI", "PineApple"),
    ("BAH", "BH", "Bahia"),
    ("BRA", "BR", "Brachiaria"),
    ("GBN", "GB", "GreenBean"),
    ("SEQ", "SQ", "Sequence"),
];

/// Crop id translation table
#[derive(Debug, Clone)]
pub struct CropCodes {
    by_three: HashMap<&'static str, (&'static str, &'static str)>,
    by_two: HashMap<&'static str, &'static str>,
}

impl Default for CropCodes {
    fn default() -> Self {
        Self::new()
    }
}

impl CropCodes {
    pub fn new() -> Self {
        let mut by_three = HashMap::with_capacity(CROPS.len());
        let mut by_two = HashMap::with_capacity(CROPS.len());
        for &(three, two, name) in CROPS {
            by_three.insert(three, (two, name));
            by_two.insert(two, three);
        }
        Self { by_three, by_two }
    }

    /// 3-character id → 2-character id, or `crid` unchanged
    pub fn to_two_char(&self, crid: &str) -> String {
        let key = crid.trim().to_uppercase();
        match self.by_three.get(key.as_str()) {
            Some((two, _)) => two.to_string(),
            None => crid.to_string(),
        }
    }

    /// 2-character id → 3-character id, or `crid` unchanged
    pub fn to_three_char(&self, crid: &str) -> String {
        let key = crid.trim().to_uppercase();
        match self.by_two.get(key.as_str()) {
            Some(three) => three.to_string(),
            None => crid.to_string(),
        }
    }

    /// Crop name for a 3- or 2-character id
    pub fn crop_name(&self, crid: &str) -> Option<&'static str> {
        let key = crid.trim().to_uppercase();
        let three = self
            .by_two
            .get(key.as_str())
            .copied()
            .unwrap_or(key.as_str());
        self.by_three.get(three).map(|(_, name)| *name)
    }

    pub fn is_known(&self, crid: &str) -> bool {
        self.crop_name(crid).is_some()
    }
}

// =============================================================================
// Observed variables
// =============================================================================

/// Observed summary variables holding calendar dates
const DATE_VARIABLES: &[&str] = &[
    "adat", "edat", "hdat", "mdat", "pdat", "r1at", "r2at", "r3at", "r4at", "r5at", "r6at",
    "r7at", "r8at", "pd1t", "pdft",
];

/// Days-after-planting alternates for date variables
const DAP_ALTERNATES: &[(&str, &str)] = &[
    ("adat", "adap"),
    ("edat", "edap"),
    ("hdat", "hdap"),
    ("mdat", "mdap"),
    ("r1at", "r1ap"),
    ("r3at", "r3ap"),
    ("r5at", "r5ap"),
    ("r7at", "r7ap"),
];

/// Whether an observed variable carries a calendar date
pub fn is_date_variable(key: &str) -> bool {
    DATE_VARIABLES.contains(&key.to_lowercase().as_str())
}

/// Whether `source` is the days-after-planting alternate of the date variable `key`
pub fn is_dap_alternate(key: &str, source: &str) -> bool {
    let key = key.to_lowercase();
    let source = source.to_lowercase();
    DAP_ALTERNATES
        .iter()
        .any(|(date, dap)| *date == key && *dap == source)
}

/// Date variable counted by the days-after-planting variable `dap`
pub fn dap_date_counterpart(dap: &str) -> Option<&'static str> {
    let dap = dap.to_lowercase();
    DAP_ALTERNATES
        .iter()
        .find(|(_, alternate)| *alternate == dap)
        .map(|(date, _)| *date)
}
