//! Fixed-width text codec for DSSAT files
//!
//! Every DSSAT reader and writer goes through this module: data lines are
//! sliced into named fields against a column layout, and records are rendered
//! back into justified columns with sentinel defaults for absent values.
//!
//! ## Architecture
//!
//! - [`codec`] - Decode layouts ([`FormatSpec`]), encode plans ([`FieldSpec`]) and the line codec
//! - [`values`] - Number, text and date column formatting with fallbacks
//! - [`dates`] - yyyymmdd ↔ yyddd conversions and the two-digit year pivot
//! - [`warnings`] - In-band warning block collected while a file is rendered

pub mod codec;
pub mod dates;
pub mod values;
pub mod warnings;

#[cfg(test)]
pub mod tests;

pub use codec::{
    Align, EncodeContext, FieldKind, FieldSpec, FormatSpec, RawRecord, decode, encode, plan_layout,
};
pub use dates::YearPivot;
pub use warnings::WarningLog;
