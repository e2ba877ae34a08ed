//! In-band warning block written at the top of produced files
//!
//! Per-record problems never abort a writer. They are collected here while a
//! file is rendered and emitted as `!` comment lines ahead of the data.

use crate::constants::LINE_ENDING;

/// Ordered collection of warning comment lines for one output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningLog {
    lines: Vec<String>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required field absent on a record
    pub fn missing(&mut self, key: &str) {
        self.lines.push(format!(
            "! Warning: Incompleted record because missing data : [{}]",
            key
        ));
    }

    /// Value wider than its column
    pub fn oversized(&mut self, key: &str, value: &str) {
        self.lines
            .push(format!("! Warning: Oversized data : [{}] {}", key, value));
    }

    /// Crop id with no known name
    pub fn undefined_crop(&mut self, crid: &str) {
        self.lines
            .push(format!("! Warning: Undefined crop id: [{}]", crid));
    }

    /// Observed variable whose name cannot fit the observation layout
    pub fn unsuitable_observed(&mut self, key: &str) {
        self.lines.push(format!(
            "! Warning: Unsuitable data for DSSAT observed data (too long): [{}]",
            key
        ));
    }

    /// Value that cannot be interpreted for its column type
    pub fn invalid_value(&mut self, key: &str, value: &str) {
        self.lines
            .push(format!("! Warning: Invalid data : [{}] {}", key, value));
    }

    /// Free-form warning line
    pub fn note(&mut self, text: &str) {
        self.lines.push(format!("! Warning: {}", text));
    }

    pub fn extend(&mut self, other: WarningLog) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Warning block with one terminated line per warning
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str(LINE_ENDING);
        }
        out
    }
}
