//! Source backends for `etiqueta_rs`
//!
//! This crate reads the supported source containers and hands their text to
//! the extraction engine in `etiqueta-core`:
//!
//! - [`XlsxBackend`] pulls one data column out of an Excel workbook
//!   (calamine).
//! - [`DocxBackend`] walks a Word document's body in order, yielding
//!   paragraphs and tables (zip + quick-xml; only text is extracted).
//! - [`SourcePipeline`] runs a batch: folder scanning, per-source isolation,
//!   parallel extraction with a deterministic merge order, deduplication.
//!
//! Backends produce [`SourceContent`](etiqueta_core::SourceContent) and
//! never expose container internals to the engine.

pub mod docx;
pub mod pipeline;
pub mod traits;
pub mod xlsx;

pub use docx::DocxBackend;
pub use pipeline::{read_source, SourcePipeline};
pub use traits::{ReadOptions, SourceBackend, SourceFormat};
pub use xlsx::XlsxBackend;
