//! The stateful scanner that turns ordered text units into records.
//!
//! Each source walks its units through one [`RecordAssembler`]. A unit
//! either resolves to a known key (possibly with an inline value), or is
//! classified as a continuation of the most recently opened key, or is
//! noise. Record boundaries depend on the source shape: spreadsheets signal
//! a new record by repeating the name key, documents carry an explicit
//! separator paragraph.

use crate::record::{FieldKey, Record, MIN_POPULATED_FIELDS};
use crate::resolver::{strip_outer, KeyResolver};
use crate::source::{BodyBlock, SourceContent};
use regex::Regex;
use std::sync::LazyLock;

/// A continuation line that itself looks like an unrecognized `label: value`
/// pair ("Rua / Avenida: ...", "Número: ...") cancels the open key instead
/// of being consumed as its value.
static UNKNOWN_KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\s/()]+:\s*.+").expect("regex is compile-time constant")
});

/// Separator paragraph that closes a record in document sources.
const RECORD_MARKER: &str = "dados destinatario";

/// How a source signals that one record ended and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// A repeated `Nome` key opens the next record (spreadsheet columns
    /// carry no explicit separator).
    KeyRepetition,
    /// Only the explicit separator paragraph closes a record; key
    /// repetition overwrites in place (document sources).
    ExplicitMarker,
}

/// What to do with a unit that resolved to no known key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// No key is open, or the open key already has its value.
    Ignore,
    /// The unit looks like an unrecognized key/value pair; the open key is
    /// cleared and the unit dropped.
    CancelOpenKey,
    /// Concatenate onto the address under construction.
    AppendToAddress(String),
    /// The open key takes this unit as its value.
    AssignToOpenKey(String),
}

/// Decide what a non-key unit means for the record under construction.
///
/// Pure: the caller applies the returned action to its state.
#[must_use]
pub fn classify(unit: &str, open_key: Option<FieldKey>, record: &Record) -> Continuation {
    let Some(key) = open_key else {
        return Continuation::Ignore;
    };
    let candidate = strip_outer(unit);
    if UNKNOWN_KEY_VALUE.is_match(candidate) {
        return Continuation::CancelOpenKey;
    }
    if key == FieldKey::Endereco {
        return Continuation::AppendToAddress(candidate.to_string());
    }
    if record.get(key).is_none() {
        return Continuation::AssignToOpenKey(candidate.to_string());
    }
    Continuation::Ignore
}

/// Scan state for one source: the record being built and the key still
/// eligible to receive continuation text.
///
/// Created empty at the start of a source, reset at every record boundary,
/// and never shared across sources.
#[derive(Debug, Default)]
pub struct ParseState {
    /// The record under construction.
    pub record: Record,
    /// Most recently recognized key still awaiting or accepting text.
    pub open_key: Option<FieldKey>,
}

/// Everything one source produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Completed records in encounter order.
    pub records: Vec<Record>,
    /// Candidates dropped for having fewer than
    /// [`MIN_POPULATED_FIELDS`] populated fields.
    pub discarded: usize,
}

/// Consumes the ordered text units of one source and emits completed
/// records.
pub struct RecordAssembler<'a> {
    resolver: &'a KeyResolver,
    mode: BoundaryMode,
    state: ParseState,
    records: Vec<Record>,
    discarded: usize,
}

impl<'a> RecordAssembler<'a> {
    #[must_use]
    pub fn new(resolver: &'a KeyResolver, mode: BoundaryMode) -> Self {
        Self {
            resolver,
            mode,
            state: ParseState::default(),
            records: Vec::new(),
            discarded: 0,
        }
    }

    /// Feed the next text unit.
    ///
    /// The unit is whitespace-normalized before any matching. Empty units
    /// are ignored without touching the open key.
    pub fn push_unit(&mut self, raw: &str) {
        let unit = normalize_unit(raw);

        if self.mode == BoundaryMode::ExplicitMarker
            && unit.to_lowercase().contains(RECORD_MARKER)
        {
            self.flush();
            return;
        }
        if unit.is_empty() || self.is_spreadsheet_noise(&unit) {
            return;
        }

        match self.resolver.resolve(&unit) {
            Some(found) => {
                if self.mode == BoundaryMode::KeyRepetition
                    && found.key == FieldKey::Nome
                    && !self.state.record.is_empty()
                {
                    self.flush();
                }
                if let Some(value) = found.value {
                    self.state.record.set(found.key, value);
                }
                self.state.open_key = Some(found.key);
            }
            None => {
                let action = classify(&unit, self.state.open_key, &self.state.record);
                self.apply(action);
            }
        }
    }

    /// Signal the end of a table row. Any open key except the address is
    /// closed, so a value in the next row cannot attach to a key opened in
    /// the previous one. An open address keeps accumulating.
    pub fn end_table_row(&mut self) {
        if self.state.open_key != Some(FieldKey::Endereco) {
            self.state.open_key = None;
        }
    }

    /// Flush the final in-progress record and return everything collected.
    #[must_use]
    pub fn finish(mut self) -> Extraction {
        self.flush();
        if self.discarded > 0 {
            log::debug!(
                "{} candidate record(s) below the {MIN_POPULATED_FIELDS}-field threshold dropped",
                self.discarded
            );
        }
        Extraction {
            records: self.records,
            discarded: self.discarded,
        }
    }

    /// Close the record under construction: emit it when it carries enough
    /// fields, count it as noise otherwise, and reset all scan state.
    fn flush(&mut self) {
        let state = std::mem::take(&mut self.state);
        if state.record.populated() >= MIN_POPULATED_FIELDS {
            self.records.push(state.record);
        } else if !state.record.is_empty() {
            self.discarded += 1;
        }
    }

    fn apply(&mut self, action: Continuation) {
        match action {
            Continuation::Ignore => {}
            Continuation::CancelOpenKey => self.state.open_key = None,
            Continuation::AppendToAddress(fragment) => {
                // Open key stays: further address lines keep concatenating.
                self.state.record.append(FieldKey::Endereco, &fragment);
            }
            Continuation::AssignToOpenKey(value) => {
                if let Some(key) = self.state.open_key.take() {
                    self.state.record.set(key, value);
                }
            }
        }
    }

    /// Spreadsheet exports render blank cells as the literal string "nan".
    fn is_spreadsheet_noise(&self, unit: &str) -> bool {
        self.mode == BoundaryMode::KeyRepetition && unit.eq_ignore_ascii_case("nan")
    }
}

/// Collapse runs of whitespace to single spaces and trim.
pub(crate) fn normalize_unit(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract records from one source's content.
#[must_use]
pub fn extract(content: &SourceContent, resolver: &KeyResolver) -> Extraction {
    match content {
        SourceContent::Spreadsheet(cells) => extract_from_cells(cells, resolver),
        SourceContent::Document(blocks) => extract_from_blocks(blocks, resolver),
    }
}

/// Extract records from the ordered cells of one spreadsheet data column.
#[must_use]
pub fn extract_from_cells(cells: &[String], resolver: &KeyResolver) -> Extraction {
    let mut assembler = RecordAssembler::new(resolver, BoundaryMode::KeyRepetition);
    for cell in cells {
        assembler.push_unit(cell);
    }
    assembler.finish()
}

/// Extract records from document body blocks in document order. Paragraphs
/// and tables are walked as they appear; table cells yield their paragraphs
/// one by one, with the open key reset at every row end.
#[must_use]
pub fn extract_from_blocks(blocks: &[BodyBlock], resolver: &KeyResolver) -> Extraction {
    let mut assembler = RecordAssembler::new(resolver, BoundaryMode::ExplicitMarker);
    for block in blocks {
        match block {
            BodyBlock::Paragraph(text) => assembler.push_unit(text),
            BodyBlock::Table(rows) => {
                for row in rows {
                    for cell in row {
                        for paragraph in cell {
                            assembler.push_unit(paragraph);
                        }
                    }
                    assembler.end_table_row();
                }
            }
        }
    }
    assembler.finish()
}
