//! # etiqueta-core - Recipient Record Extraction Engine
//!
//! This crate recovers structured recipient records (name, tax id, address,
//! phone, card quantity, region code) from the semi-structured free text
//! found in spreadsheet cells and word-processing documents, deduplicates
//! them, and lays them out into a fixed-geometry label grid ready for
//! rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        SourceContent                           │
//! │   (one spreadsheet column, or document body blocks in order)   │
//! └────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       RecordAssembler                          │
//! │   KeyResolver (alias table) + continuation classification      │
//! │   + boundary detection (key repetition / explicit marker)      │
//! └────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//!                    dedup() ──► layout() ──► LayoutGrid
//! ```
//!
//! The engine performs no I/O. Input backends produce [`SourceContent`],
//! and an output collaborator renders the [`LayoutGrid`]; both live in
//! sibling crates.

pub mod assembler;
pub mod config;
pub mod error;
pub mod layout;
pub mod record;
pub mod resolver;
pub mod source;

pub use assembler::{
    classify, extract, extract_from_blocks, extract_from_cells, BoundaryMode, Continuation,
    Extraction, ParseState, RecordAssembler,
};
pub use config::{AliasEntry, AliasTable, ExtractConfig, LabelGeometry, PageSetup};
pub use error::{EtiquetaError, Result};
pub use layout::{layout, CellAlignment, CellStyle, GridRow, LabelCell, LayoutGrid};
pub use record::{dedup, FieldKey, Record, MIN_POPULATED_FIELDS};
pub use resolver::{KeyMatch, KeyResolver};
pub use source::{BodyBlock, SourceContent};
