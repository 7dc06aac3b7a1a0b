//! Single-pass reader for ragged, multi-section CSV exports.
//!
//! A document is described by an ordered list of [`SectionSpec`]s. The parser
//! walks the records once and moves through three states per section:
//! seeking its start, inside it, and ended. Rows inside a section are yielded
//! as [`SectionRow`]s tagged with the section name; everything else is
//! skipped.
//!
//! Field splitting is delegated to the `csv` crate in flexible mode, so quoted
//! fields may contain delimiters and line breaks and rows may be ragged.
//! Whitespace between a delimiter and an opening quote is dropped first, so
//! `a, "b, c"` still has two fields. Callers must bounds-check field indices.
//!
//! A required section is searched for until end-of-input; sentinels of the
//! sections after it are ignored until it has been found.

use std::borrow::Cow;
use std::io::Cursor;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::IngestError;

/// How a section's first row is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStart {
    /// After a row whose first trimmed field starts with this prefix
    /// (case-sensitive). The sentinel row itself is not yielded.
    Sentinel(&'static str),
    /// After this many leading records, whatever they contain.
    Preamble(usize),
}

/// What blank rows, short rows, and blank-line gaps do inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// A blank or short row ends the section. A blank line ends it once at
    /// least one row has been yielded.
    End,
    /// Blank and short rows are dropped; blank lines are ignored.
    Skip,
}

#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub name: &'static str,
    pub start: SectionStart,
    /// Reaching end-of-input without entering this section is an error.
    pub required: bool,
    /// Rows with fewer fields count as short.
    pub min_fields: usize,
    pub gaps: GapPolicy,
    /// The section ends after this many rows.
    pub max_rows: Option<usize>,
    /// Extra first-field prefixes that end the section.
    pub terminators: &'static [&'static str],
}

impl SectionSpec {
    #[must_use]
    pub fn sentinel(name: &'static str, prefix: &'static str) -> Self {
        Self::with_start(name, SectionStart::Sentinel(prefix))
    }

    #[must_use]
    pub fn preamble(name: &'static str, lines: usize) -> Self {
        Self::with_start(name, SectionStart::Preamble(lines))
    }

    fn with_start(name: &'static str, start: SectionStart) -> Self {
        Self {
            name,
            start,
            required: false,
            min_fields: 1,
            gaps: GapPolicy::End,
            max_rows: None,
            terminators: &[],
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min_fields(mut self, min_fields: usize) -> Self {
        self.min_fields = min_fields;
        self
    }

    #[must_use]
    pub fn skip_gaps(mut self) -> Self {
        self.gaps = GapPolicy::Skip;
        self
    }

    #[must_use]
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    #[must_use]
    pub fn terminated_by(mut self, prefixes: &'static [&'static str]) -> Self {
        self.terminators = prefixes;
        self
    }

    fn sentinel_prefix(&self) -> Option<&'static str> {
        match self.start {
            SectionStart::Sentinel(prefix) => Some(prefix),
            SectionStart::Preamble(_) => None,
        }
    }

    fn missing_error(&self) -> IngestError {
        match self.start {
            SectionStart::Sentinel(prefix) => IngestError::MalformedDocument {
                sentinel: prefix.to_string(),
            },
            SectionStart::Preamble(expected) => IngestError::TruncatedPreamble { expected, found: 0 },
        }
    }
}

/// One data row of a section, fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRow {
    pub section: &'static str,
    /// 1-based line the row starts on.
    pub line: u64,
    pub fields: Vec<String>,
}

impl SectionRow {
    /// The trimmed field at `idx`, if the row is wide enough.
    #[must_use]
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Seeking { section: usize, consumed: usize },
    InSection { section: usize, emitted: usize },
    Ended,
}

struct RawRow {
    line: u64,
    fields: Vec<String>,
    /// At least one empty line sits between this row and the previous one.
    after_blank_line: bool,
}

impl RawRow {
    fn first_field(&self) -> &str {
        self.fields.first().map_or("", String::as_str)
    }

    fn is_blank(&self) -> bool {
        self.fields.iter().all(String::is_empty)
    }
}

/// Iterator over the section rows of one document.
///
/// Yields `Err` at most once, after which it is exhausted.
pub struct SectionedTableParser<'a> {
    reader: csv::Reader<Cursor<Cow<'a, [u8]>>>,
    sections: Vec<SectionSpec>,
    state: State,
    pending: Option<RawRow>,
}

impl<'a> SectionedTableParser<'a> {
    #[must_use]
    pub fn new(source: &'a str, sections: Vec<SectionSpec>) -> Self {
        let bytes = match trim_space_before_quotes(source) {
            Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
            Cow::Owned(text) => Cow::Owned(text.into_bytes()),
        };
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(bytes));
        let state = if sections.is_empty() {
            State::Ended
        } else {
            State::Seeking {
                section: 0,
                consumed: 0,
            }
        };
        Self {
            reader,
            sections,
            state,
            pending: None,
        }
    }

    fn read_row(&mut self) -> Result<Option<RawRow>, IngestError> {
        let mut record = StringRecord::new();
        if !self.reader.read_record(&mut record)? {
            return Ok(None);
        }
        let (line, byte) = record
            .position()
            .map_or((0, 0), |pos| (pos.line(), pos.byte()));
        let source: &[u8] = self.reader.get_ref().get_ref();
        let (skipped_breaks, after_blank_line) =
            leading_line_breaks(source, usize::try_from(byte).unwrap_or(usize::MAX));
        Ok(Some(RawRow {
            line: line + skipped_breaks,
            fields: record.iter().map(|f| f.trim().to_string()).collect(),
            after_blank_line,
        }))
    }

    /// Index of the first section from `from` up to and including the next
    /// required one whose sentinel opens `first_field`.
    fn sentinel_match(&self, from: usize, first_field: &str) -> Option<usize> {
        let last = self.sections[from..]
            .iter()
            .position(|spec| spec.required)
            .map_or(self.sections.len(), |offset| from + offset + 1);
        self.sections[from..last]
            .iter()
            .position(|spec| spec.sentinel_prefix().is_some_and(|p| first_field.starts_with(p)))
            .map(|offset| from + offset)
    }

    fn other_sentinel(&self, current: usize, first_field: &str) -> Option<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != current)
            .find(|(_, spec)| spec.sentinel_prefix().is_some_and(|p| first_field.starts_with(p)))
            .map(|(idx, _)| idx)
    }

    fn enter(&mut self, section: usize) {
        debug!(section = self.sections[section].name, "entering section");
        self.state = State::InSection {
            section,
            emitted: 0,
        };
    }

    fn end_section(&mut self, section: usize) {
        debug!(section = self.sections[section].name, "section ended");
        self.state = if section + 1 < self.sections.len() {
            State::Seeking {
                section: section + 1,
                consumed: 0,
            }
        } else {
            State::Ended
        };
    }

    fn step(&mut self, row: RawRow) -> Option<SectionRow> {
        match self.state {
            State::Ended => None,
            State::Seeking { section, consumed } => {
                let start = self.sections[section].start;
                match start {
                    SectionStart::Preamble(lines) if consumed < lines => {
                        self.state = State::Seeking {
                            section,
                            consumed: consumed + 1,
                        };
                    }
                    SectionStart::Preamble(_) => {
                        self.enter(section);
                        self.pending = Some(row);
                    }
                    SectionStart::Sentinel(_) => {
                        if let Some(found) = self.sentinel_match(section, row.first_field()) {
                            self.enter(found);
                        }
                    }
                }
                None
            }
            State::InSection { section, emitted } => {
                if self.other_sentinel(section, row.first_field()).is_some() {
                    match self.sentinel_match(section + 1, row.first_field()) {
                        Some(next) => self.enter(next),
                        None => self.end_section(section),
                    }
                    return None;
                }

                let spec = &self.sections[section];
                let (name, gaps, max_rows) = (spec.name, spec.gaps, spec.max_rows);
                let terminated = spec
                    .terminators
                    .iter()
                    .any(|t| row.first_field().starts_with(t));
                let short = row.is_blank() || row.fields.len() < spec.min_fields;

                if terminated {
                    self.end_section(section);
                    self.pending = Some(row);
                    return None;
                }

                match gaps {
                    GapPolicy::End if short || (row.after_blank_line && emitted > 0) => {
                        self.end_section(section);
                        self.pending = Some(row);
                        return None;
                    }
                    GapPolicy::Skip if short => return None,
                    _ => {}
                }

                let emitted = emitted + 1;
                if max_rows.is_some_and(|max| emitted >= max) {
                    self.end_section(section);
                } else {
                    self.state = State::InSection { section, emitted };
                }
                Some(SectionRow {
                    section: name,
                    line: row.line,
                    fields: row.fields,
                })
            }
        }
    }

    /// End-of-input: report the first required section that was never entered.
    fn finish(&mut self) -> Option<IngestError> {
        let state = std::mem::replace(&mut self.state, State::Ended);
        let from = match state {
            State::Ended => return None,
            State::Seeking { section, consumed } => match self.sections[section].start {
                SectionStart::Preamble(expected) if consumed < expected => {
                    if self.sections[section].required {
                        return Some(IngestError::TruncatedPreamble {
                            expected,
                            found: consumed,
                        });
                    }
                    section + 1
                }
                SectionStart::Preamble(_) => section + 1,
                SectionStart::Sentinel(_) => section,
            },
            State::InSection { section, .. } => section + 1,
        };
        self.sections[from..]
            .iter()
            .find(|spec| spec.required)
            .map(SectionSpec::missing_error)
    }
}

impl Iterator for SectionedTableParser<'_> {
    type Item = Result<SectionRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Ended {
                return None;
            }
            let row = match self.pending.take() {
                Some(row) => row,
                None => match self.read_row() {
                    Ok(Some(row)) => row,
                    Ok(None) => return self.finish().map(Err),
                    Err(e) => {
                        self.state = State::Ended;
                        return Some(Err(e));
                    }
                },
            };
            if let Some(out) = self.step(row) {
                return Some(Ok(out));
            }
        }
    }
}

/// Drop spaces and tabs that sit between a field start and an opening quote.
///
/// The csv reader only honours a quote as the first byte of a field, so
/// without this `1, "Hello, world"` would split inside the quotes. Quoted
/// content is passed through untouched.
fn trim_space_before_quotes(source: &str) -> Cow<'_, str> {
    if !source.contains('"') {
        return Cow::Borrowed(source);
    }
    let bytes = source.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut field_start = true;
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        if in_quotes {
            if bytes[i] == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                in_quotes = false;
            }
            i += 1;
            continue;
        }
        if field_start {
            field_start = false;
            let space = bytes[i..]
                .iter()
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
            if space > 0 && bytes.get(i + space) == Some(&b'"') {
                out.push_str(&source[copied..i]);
                i += space;
                copied = i;
            }
            if bytes[i] == b'"' {
                in_quotes = true;
                i += 1;
                continue;
            }
        }
        if matches!(bytes[i], b',' | b'\n' | b'\r') {
            field_start = true;
        }
        i += 1;
    }
    if copied == 0 {
        return Cow::Borrowed(source);
    }
    out.push_str(&source[copied..]);
    Cow::Owned(out)
}

/// Line breaks between the reader's resume point and the next record.
///
/// The csv reader skips empty lines without reporting them, so they are
/// recovered from the raw bytes. A lone `\n` left over from a `\r\n`
/// terminator is not a blank line.
fn leading_line_breaks(source: &[u8], offset: usize) -> (u64, bool) {
    let Some(rest) = source.get(offset..) else {
        return (0, false);
    };
    let run = rest
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .count();
    let newlines = rest[..run].iter().filter(|b| **b == b'\n').count();
    let leftover_lf =
        offset > 0 && source.get(offset - 1) == Some(&b'\r') && rest.first() == Some(&b'\n');
    let blank = run > usize::from(leftover_lf);
    (u64::try_from(newlines).unwrap_or(u64::MAX), blank)
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
