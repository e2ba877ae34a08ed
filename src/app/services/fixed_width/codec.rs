//! Positional field decoding and encoding
//!
//! A [`FormatSpec`] is the decode-side layout: ordered `(name, width)` pairs.
//! A [`FieldSpec`] plan is the encode-side layout, adding the column type,
//! justification, leading gap and default for every field.

use super::values::{format_date, format_number, format_relative_date, format_text};
use super::warnings::WarningLog;
use crate::app::models::{Fields, FieldsExt};
use crate::constants::DEFAULT_VALUE;

/// Decoded data line: field name → trimmed non-empty value
pub type RawRecord = Fields;

/// Ordered column layout used to slice data lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    fields: Vec<(String, usize)>,
}

impl FormatSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(n, w)| (n.into(), w)).collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, width: usize) {
        self.fields.push((name.into(), width));
    }

    pub fn with(mut self, name: impl Into<String>, width: usize) -> Self {
        self.push(name, width);
        self
    }

    /// Layout derived from a column header line
    ///
    /// Each whitespace-separated token becomes a lowercase field whose width
    /// runs from the end of the previous token to the end of this one, so
    /// right-aligned data under each title is captured whole. A leading `@`
    /// is treated as blank.
    pub fn from_header(header: &str) -> Self {
        let mut spec = Self::new();
        let mut previous_end = 0;
        let mut token = String::new();

        let chars = header
            .chars()
            .enumerate()
            .map(|(i, c)| if i == 0 && c == '@' { ' ' } else { c })
            .chain(std::iter::once(' '));

        for (index, c) in chars.enumerate() {
            if c.is_whitespace() {
                if !token.is_empty() {
                    spec.push(token.to_lowercase(), index - previous_end);
                    previous_end = index;
                    token.clear();
                }
            } else {
                token.push(c);
            }
        }
        spec
    }

    pub fn fields(&self) -> &[(String, usize)] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn total_width(&self) -> usize {
        self.fields.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Slice `line` by the widths of `spec`
///
/// Slices are trimmed and empty ones are omitted. A line shorter than the
/// layout simply yields fewer fields.
pub fn decode(line: &str, spec: &FormatSpec) -> RawRecord {
    let chars: Vec<char> = line.chars().collect();
    let mut record = RawRecord::new();
    let mut start = 0;

    for (name, width) in spec.fields() {
        if start >= chars.len() {
            break;
        }
        let end = (start + width).min(chars.len());
        let slice: String = chars[start..end].iter().collect();
        let trimmed = slice.trim();
        if !trimmed.is_empty() {
            record.insert(name.clone(), trimmed.to_string());
        }
        start += width;
    }
    record
}

/// How a field's value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// Written as given, no width checks
    Verbatim,
    /// yyyymmdd rendered as yyddd
    Date,
    /// yyyymmdd rendered as the day part of yyddd
    DayOfYear,
    /// yyyymmdd rendered as days after the context's reference date
    RelativeDate,
}

/// Justification within the column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One column of an encode plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub width: usize,
    /// Spaces written before the column
    pub gap: usize,
    pub kind: FieldKind,
    pub align: Align,
    pub default: String,
}

impl FieldSpec {
    fn new(name: &str, width: usize, kind: FieldKind, align: Align) -> Self {
        Self {
            name: name.to_string(),
            width,
            gap: 0,
            kind,
            align,
            default: DEFAULT_VALUE.to_string(),
        }
    }

    pub fn text(name: &str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Text, Align::Left)
    }

    pub fn number(name: &str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Number, Align::Right)
    }

    pub fn verbatim(name: &str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Verbatim, Align::Left)
    }

    pub fn date(name: &str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Date, Align::Right)
    }

    pub fn day_of_year(name: &str, width: usize) -> Self {
        Self::new(name, width, FieldKind::DayOfYear, Align::Right)
    }

    pub fn relative_date(name: &str, width: usize) -> Self {
        Self::new(name, width, FieldKind::RelativeDate, Align::Right)
    }

    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }
}

/// Per-line encode inputs
pub struct EncodeContext<'a> {
    /// Reference date (yyyymmdd) for relative date fields
    pub reference_date: Option<&'a str>,
    pub warnings: &'a mut WarningLog,
}

impl<'a> EncodeContext<'a> {
    pub fn new(warnings: &'a mut WarningLog) -> Self {
        Self {
            reference_date: None,
            warnings,
        }
    }

    pub fn with_reference_date(mut self, reference: Option<&'a str>) -> Self {
        self.reference_date = reference;
        self
    }
}

/// Render `record` as one line following `plan`
///
/// Values that exceed their width after formatting are written in full and
/// shift the remainder of the line; the warning log records them.
pub fn encode(record: &Fields, plan: &[FieldSpec], ctx: &mut EncodeContext<'_>) -> String {
    let mut line = String::new();
    for field in plan {
        let value = match field.kind {
            FieldKind::Text => {
                format_text(field.width, record, &field.name, &field.default, ctx.warnings)
            }
            FieldKind::Number => {
                format_number(field.width, record, &field.name, &field.default, ctx.warnings)
            }
            FieldKind::Verbatim => record.value_or(&field.name, &field.default).to_string(),
            FieldKind::Date => format_date(record, &field.name, &field.default, ctx.warnings),
            FieldKind::DayOfYear => {
                let date = format_date(record, &field.name, &field.default, ctx.warnings);
                if date == field.default {
                    date
                } else {
                    date.chars().skip(2).collect()
                }
            }
            FieldKind::RelativeDate => format_relative_date(
                record,
                &field.name,
                ctx.reference_date,
                &field.default,
                ctx.warnings,
            ),
        };

        line.extend(std::iter::repeat_n(' ', field.gap));
        match field.align {
            Align::Left => line.push_str(&format!("{:<width$}", value, width = field.width)),
            Align::Right => line.push_str(&format!("{:>width$}", value, width = field.width)),
        }
    }
    line
}

/// Decode layout matching the columns written by `plan`
pub fn plan_layout(plan: &[FieldSpec]) -> FormatSpec {
    FormatSpec::from_fields(plan.iter().map(|f| (f.name.clone(), f.gap + f.width)))
}
