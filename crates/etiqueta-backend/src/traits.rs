//! Core trait definitions for source backends.

use etiqueta_core::{EtiquetaError, Result, SourceContent};
use std::path::Path;

/// Supported source container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Microsoft Word document (.docx)
    Docx,
    /// Microsoft Excel workbook (.xlsx)
    Xlsx,
}

impl SourceFormat {
    /// Detect the format from a file extension, case-insensitively.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Canonical extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Options for reading a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Zero-based spreadsheet column holding the record data. Ignored by
    /// document backends.
    pub data_column: usize,
}

impl ReadOptions {
    /// Set the spreadsheet data column.
    #[inline]
    #[must_use = "returns options with the data column configured"]
    pub const fn with_data_column(mut self, column: usize) -> Self {
        self.data_column = column;
        self
    }
}

impl Default for ReadOptions {
    #[inline]
    fn default() -> Self {
        Self { data_column: 0 }
    }
}

/// Main trait for source backends.
///
/// Each backend turns one container format into the ordered text units the
/// extraction engine consumes.
pub trait SourceBackend: Send + Sync {
    /// The format this backend handles.
    fn format(&self) -> SourceFormat;

    /// Read source content from bytes.
    ///
    /// # Errors
    /// Returns an error if the container cannot be parsed.
    fn read_bytes(&self, data: &[u8], options: &ReadOptions) -> Result<SourceContent>;

    /// Read source content from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn read_path<P: AsRef<Path>>(&self, path: P, options: &ReadOptions) -> Result<SourceContent> {
        let data = std::fs::read(path.as_ref()).map_err(EtiquetaError::Io)?;
        self.read_bytes(&data, options)
    }

    /// Check whether this backend handles the given format.
    fn can_handle(&self, format: SourceFormat) -> bool {
        self.format() == format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(SourceFormat::from_extension("DOCX"), Some(SourceFormat::Docx));
        assert_eq!(SourceFormat::from_extension("Xlsx"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_extension("pdf"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn test_canonical_extensions_round_trip() {
        for format in [SourceFormat::Docx, SourceFormat::Xlsx] {
            assert_eq!(SourceFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn test_read_options_default_column_is_first() {
        assert_eq!(ReadOptions::default().data_column, 0);
    }

    #[test]
    fn test_read_options_with_data_column() {
        let opts = ReadOptions::default().with_data_column(3);
        assert_eq!(opts.data_column, 3);
    }
}
