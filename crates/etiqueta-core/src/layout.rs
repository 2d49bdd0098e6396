//! Label formatting and grid placement.
//!
//! Unique records become label texts and are placed two per row, left to
//! right, top to bottom. The grid carries the physical geometry and cell
//! styling as plain data for the rendering collaborator.

use crate::config::LabelGeometry;
use crate::record::{FieldKey, Record};

/// Formatted multi-line text for one printed label.
///
/// Fields are printed in the fixed [`FieldKey::ALL`] order; fields with an
/// empty value are omitted entirely rather than rendered as blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCell {
    /// One printed line per populated field, `"<label>: <value>"`.
    pub lines: Vec<String>,
}

impl LabelCell {
    /// Format one record into its label lines.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let mut lines = Vec::new();
        for key in FieldKey::ALL {
            if let Some(value) = record.get(key) {
                let value = value.trim();
                if !value.is_empty() {
                    lines.push(format!("{}: {value}", key.label()));
                }
            }
        }
        Self { lines }
    }

    /// The label as a single newline-joined string.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Paragraph alignment inside a label cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlignment {
    Left,
    Center,
    Right,
}

/// Rendering parameters applied to every label cell. These are data for
/// the output collaborator, not algorithmic state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStyle {
    pub alignment: CellAlignment,
    /// Single line spacing inside the label.
    pub single_spacing: bool,
    /// Space before each paragraph, in points.
    pub space_before_pt: u32,
    /// Space after each paragraph, in points.
    pub space_after_pt: u32,
    /// Run font size, in points.
    pub font_size_pt: u32,
    pub font_family: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            alignment: CellAlignment::Left,
            single_spacing: true,
            space_before_pt: 0,
            space_after_pt: 0,
            font_size_pt: 8,
            font_family: "Arial".to_string(),
        }
    }
}

/// One grid row: label, spacer, label. The right label is absent on the
/// last row when the record count is odd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub left: LabelCell,
    pub right: Option<LabelCell>,
}

/// The document-ready label grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGrid {
    /// Rows in placement order, `ceil(label count / 2)` of them.
    pub rows: Vec<GridRow>,
    pub geometry: LabelGeometry,
    pub style: CellStyle,
}

impl LayoutGrid {
    /// Number of labels placed in the grid.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| 1 + usize::from(row.right.is_some()))
            .sum()
    }
}

/// Place records into the two-labels-per-row grid, in encounter order.
///
/// Returns `None` when there are no records: there is nothing to generate,
/// and the rendering stage must not be invoked.
#[must_use]
pub fn layout(records: &[Record], geometry: &LabelGeometry) -> Option<LayoutGrid> {
    if records.is_empty() {
        return None;
    }
    let rows = records
        .chunks(2)
        .map(|pair| GridRow {
            left: LabelCell::from_record(&pair[0]),
            right: pair.get(1).map(LabelCell::from_record),
        })
        .collect();
    Some(LayoutGrid {
        rows,
        geometry: *geometry,
        style: CellStyle::default(),
    })
}
