//! The shape input backends hand to the record assembler.

/// Text units extracted from one source, preserving encounter order.
///
/// Backends never hand over container internals; the assembler only ever
/// sees ordered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContent {
    /// The ordered cells of one spreadsheet data column.
    Spreadsheet(Vec<String>),
    /// Document body blocks in the order they appear.
    Document(Vec<BodyBlock>),
}

/// One block of a word-processing document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyBlock {
    /// A body paragraph's text.
    Paragraph(String),
    /// A table: rows, each a list of cells, each cell a list of paragraph
    /// texts.
    Table(Vec<Vec<Vec<String>>>),
}
