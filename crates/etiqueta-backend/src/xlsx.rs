//! Microsoft Excel (.xlsx) source reader using calamine.
//!
//! The record data sits in a single column of the first worksheet; the
//! reader pulls that column out as an ordered list of cell strings and
//! leaves all record semantics to the extraction engine.

use crate::traits::{ReadOptions, SourceBackend, SourceFormat};
use calamine::{Data, Range, Reader, Xlsx};
use etiqueta_core::{EtiquetaError, Result, SourceContent};
use std::io::Cursor;

/// Backend for Excel workbooks (.xlsx).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XlsxBackend;

impl XlsxBackend {
    /// Create a new XLSX backend.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SourceBackend for XlsxBackend {
    fn format(&self) -> SourceFormat {
        SourceFormat::Xlsx
    }

    fn read_bytes(&self, data: &[u8], options: &ReadOptions) -> Result<SourceContent> {
        let cursor = Cursor::new(data.to_vec());
        let mut workbook: Xlsx<_> = Xlsx::new(cursor)
            .map_err(|e| EtiquetaError::Parse(format!("not a valid xlsx workbook: {e}")))?;

        let sheet = workbook
            .sheet_names()
            .into_iter()
            .next()
            .ok_or_else(|| EtiquetaError::Parse("workbook has no worksheets".to_string()))?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| EtiquetaError::Parse(format!("worksheet {sheet}: {e}")))?;

        let cells = column_cells(&range, options.data_column);
        if cells.is_empty() {
            return Err(EtiquetaError::Parse(format!(
                "data column {} is empty or outside the used range of sheet {sheet}",
                options.data_column
            )));
        }
        Ok(SourceContent::Spreadsheet(cells))
    }
}

/// Collect the non-empty cells of one absolute column, top to bottom.
///
/// The worksheet range is anchored at its first used cell, so the absolute
/// column index is translated into the range before indexing.
fn column_cells(range: &Range<Data>, column: usize) -> Vec<String> {
    let start_col = range.start().map_or(0, |(_, col)| col as usize);
    let mut cells = Vec::new();
    for row in range.rows() {
        let value = column
            .checked_sub(start_col)
            .and_then(|rel| row.get(rel))
            .and_then(cell_to_string);
        if let Some(value) = value {
            cells.push(value);
        }
    }
    cells
}

/// Render one cell as text. Empty and error cells disappear; integral
/// floats drop the trailing `.0` so numeric id columns survive as digits.
fn cell_to_string(data: &Data) -> Option<String> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}
