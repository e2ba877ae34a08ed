//! Line classification state machine shared by every DSSAT reader
//!
//! DSSAT files mark structure in the first column: `*` opens a major section,
//! `@` introduces a column header, `!` is a comment, and anything else is data
//! laid out by the most recent header. The state machine here is identical for
//! every file kind; a [`FormatStrategy`] supplies the per-kind rules for naming
//! sections and turning header lines into column layouts.

use crate::app::services::fixed_width::{FormatSpec, RawRecord, decode};

/// Major section and sub-section label chosen by a strategy for a `*` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMarker {
    pub section: String,
    pub label: String,
}

impl SectionMarker {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            label: String::new(),
        }
    }
}

/// Per-file-kind rules plugged into [`LineClassifier`]
pub trait FormatStrategy {
    /// Interpret a `*` line
    fn classify_section(&self, line: &str) -> SectionMarker;

    /// Layout for the data carried on the `*` line itself, decoded from column 1
    fn section_layout(&self, _section: &str) -> Option<FormatSpec> {
        None
    }

    /// Layout for data lines following the `@` header with lowercase `label`
    fn header_layout(&self, section: &str, label: &str, header_line: &str) -> Option<FormatSpec>;
}

/// Kind of the most recently classified line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    Section,
    Title,
    Data,
    #[default]
    Comment,
}

/// Result of classifying one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// `*` line; `text` excludes the marker, `record` is set when the strategy gives a section layout
    Section {
        section: String,
        label: String,
        text: String,
        record: Option<RawRecord>,
    },
    /// `@` header line
    Title { section: String, label: String },
    /// Data line decoded against the active layout
    Data {
        section: String,
        label: String,
        record: RawRecord,
    },
    /// `!` comment or blank line
    Comment,
    /// Data line with no active layout
    Skipped,
}

/// Stateful classifier carrying `(section, label, kind)` across lines
#[derive(Debug)]
pub struct LineClassifier<S> {
    strategy: S,
    section: String,
    label: String,
    kind: LineKind,
    layout: Option<FormatSpec>,
}

impl<S: FormatStrategy> LineClassifier<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            section: String::new(),
            label: String::new(),
            kind: LineKind::default(),
            layout: None,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Layout currently applied to data lines
    pub fn layout(&self) -> Option<&FormatSpec> {
        self.layout.as_ref()
    }

    /// Advance the state machine by one line
    pub fn classify(&mut self, line: &str) -> ClassifiedLine {
        if let Some(text) = line.strip_prefix('*') {
            let marker = self.strategy.classify_section(line);
            self.section = marker.section;
            self.label = marker.label;
            self.kind = LineKind::Section;
            self.layout = self.strategy.section_layout(&self.section);
            let record = self.layout.as_ref().map(|spec| decode(text, spec));
            return ClassifiedLine::Section {
                section: self.section.clone(),
                label: self.label.clone(),
                text: text.to_string(),
                record,
            };
        }

        if let Some(header) = line.strip_prefix('@') {
            self.label = header.trim().to_lowercase();
            self.kind = LineKind::Title;
            self.layout = self
                .strategy
                .header_layout(&self.section, &self.label, line);
            return ClassifiedLine::Title {
                section: self.section.clone(),
                label: self.label.clone(),
            };
        }

        if line.starts_with('!') || line.trim().is_empty() {
            self.kind = LineKind::Comment;
            return ClassifiedLine::Comment;
        }

        self.kind = LineKind::Data;
        match &self.layout {
            Some(spec) => ClassifiedLine::Data {
                section: self.section.clone(),
                label: self.label.clone(),
                record: decode(line, spec),
            },
            None => ClassifiedLine::Skipped,
        }
    }
}

/// Column name at `index` in a lowercase header label
pub fn column_at(label: &str, index: usize) -> Option<&str> {
    label.split_whitespace().nth(index)
}

/// First column name in a header label
pub fn leading_column(label: &str) -> Option<&str> {
    column_at(label, 0)
}

/// Whether a header label carries the column `name`
pub fn has_column(label: &str, name: &str) -> bool {
    label.split_whitespace().any(|c| c == name)
}
