//! Test utilities for the fixed-width codec

use crate::app::models::Fields;

mod codec_tests;
mod values_tests;

/// Build a field map from literal pairs
pub fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
