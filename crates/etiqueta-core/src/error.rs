//! Error types for the extraction and rendering pipeline.

use thiserror::Error;

/// Error types that can occur while extracting records or rendering the
/// label sheet.
///
/// Recoverable per-source conditions (unreadable file, corrupt container,
/// missing data column) are surfaced as [`EtiquetaError::Parse`] or
/// [`EtiquetaError::Io`] and caught at the per-source boundary, where the
/// source is skipped with a warning. [`EtiquetaError::Render`] is fatal for
/// the run.
#[derive(Error, Debug)]
pub enum EtiquetaError {
    /// File I/O error while reading a source or creating the output file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source container could not be parsed into text units.
    #[error("parse error: {0}")]
    Parse(String),

    /// The file extension is missing or maps to no supported format.
    #[error("format error: {0}")]
    Format(String),

    /// The configuration (alias table, geometry) is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The output document could not be produced or persisted.
    #[error("render error: {0}")]
    Render(String),
}

/// Type alias for [`Result<T, EtiquetaError>`].
pub type Result<T> = std::result::Result<T, EtiquetaError>;
