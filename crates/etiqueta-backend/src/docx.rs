//! Microsoft Word (.docx) source reader.
//!
//! A DOCX file is a ZIP archive whose main content lives in
//! `word/document.xml`. The reader streams that part with quick-xml and
//! walks the body, emitting paragraphs and tables interleaved in document
//! order, which is the order the extraction engine's boundary rules depend
//! on.
//! Only text is extracted; styling, images and headers are ignored.

use crate::traits::{ReadOptions, SourceBackend, SourceFormat};
use etiqueta_core::{BodyBlock, EtiquetaError, Result, SourceContent};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Backend for Word documents (.docx).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocxBackend;

impl DocxBackend {
    /// Create a new DOCX backend.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SourceBackend for DocxBackend {
    fn format(&self) -> SourceFormat {
        SourceFormat::Docx
    }

    fn read_bytes(&self, data: &[u8], _options: &ReadOptions) -> Result<SourceContent> {
        let document_xml = read_document_xml(data)?;
        let blocks = walk_body(&document_xml)?;
        Ok(SourceContent::Document(blocks))
    }
}

/// Pull `word/document.xml` out of the ZIP container.
fn read_document_xml(data: &[u8]) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| EtiquetaError::Parse(format!("not a valid docx container: {e}")))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| EtiquetaError::Parse(format!("word/document.xml missing: {e}")))?;
    let mut content = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut content)?;
    Ok(content)
}

/// State for walking the document body.
///
/// Location flags mirror the XML nesting: whether the cursor sits inside
/// the body, a table (with depth, so nested tables flatten into the
/// enclosing one instead of closing it early), a cell, a paragraph, a text
/// run.
#[derive(Debug, Default)]
struct BodyWalker {
    blocks: Vec<BodyBlock>,
    in_body: bool,
    table_depth: usize,
    in_cell: bool,
    in_paragraph: bool,
    in_text: bool,
    paragraph: String,
    current_cell: Vec<String>,
    current_row: Vec<Vec<String>>,
    current_table: Vec<Vec<Vec<String>>>,
}

impl BodyWalker {
    fn handle_start(&mut self, name: &[u8]) {
        match name {
            b"w:body" => self.in_body = true,
            b"w:tbl" if self.in_body => self.table_depth += 1,
            b"w:tr" if self.table_depth == 1 => self.current_row = Vec::new(),
            b"w:tc" if self.table_depth == 1 => {
                self.in_cell = true;
                self.current_cell = Vec::new();
            }
            b"w:p" if self.in_body => {
                self.in_paragraph = true;
                self.paragraph.clear();
            }
            b"w:t" if self.in_paragraph => self.in_text = true,
            _ => {}
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        match name {
            b"w:body" => self.in_body = false,
            b"w:tbl" if self.table_depth > 0 => {
                self.table_depth -= 1;
                if self.table_depth == 0 {
                    let rows = std::mem::take(&mut self.current_table);
                    self.blocks.push(BodyBlock::Table(rows));
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.current_row);
                self.current_table.push(row);
            }
            b"w:tc" if self.table_depth == 1 => {
                self.in_cell = false;
                let cell = std::mem::take(&mut self.current_cell);
                self.current_row.push(cell);
            }
            b"w:p" if self.in_paragraph => {
                self.in_paragraph = false;
                let text = std::mem::take(&mut self.paragraph);
                if self.in_cell {
                    self.current_cell.push(text);
                } else if self.table_depth == 0 {
                    self.blocks.push(BodyBlock::Paragraph(text));
                }
                // Paragraphs between rows of a table are dropped.
            }
            b"w:t" => self.in_text = false,
            _ => {}
        }
    }

    /// Line breaks and tabs inside a run separate words; the assembler
    /// collapses the whitespace later.
    fn handle_empty(&mut self, name: &[u8]) {
        if self.in_paragraph && matches!(name, b"w:tab" | b"w:br" | b"w:cr") {
            self.paragraph.push(' ');
        }
    }
}

/// Walk the body of `word/document.xml`, producing paragraphs and tables in
/// document order.
fn walk_body(xml: &[u8]) -> Result<Vec<BodyBlock>> {
    let mut reader = Reader::from_reader(xml);
    let mut walker = BodyWalker::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => walker.handle_start(e.name().as_ref()),
            Ok(Event::End(e)) => walker.handle_end(e.name().as_ref()),
            Ok(Event::Empty(e)) => walker.handle_empty(e.name().as_ref()),
            Ok(Event::Text(t)) if walker.in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| EtiquetaError::Parse(format!("bad document.xml text: {e}")))?;
                walker.paragraph.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(EtiquetaError::Parse(format!("bad document.xml: {e}")));
            }
        }
        buf.clear();
    }
    Ok(walker.blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Wrap WordprocessingML body content into an in-memory .docx.
    fn docx_bytes(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn test_paragraphs_come_out_in_body_order() {
        let body = format!("{}{}", paragraph("Nome: A"), paragraph("CPF: 1"));
        let content = DocxBackend::new()
            .read_bytes(&docx_bytes(&body), &ReadOptions::default())
            .unwrap();
        assert_eq!(
            content,
            SourceContent::Document(vec![
                BodyBlock::Paragraph("Nome: A".to_string()),
                BodyBlock::Paragraph("CPF: 1".to_string()),
            ])
        );
    }

    #[test]
    fn test_table_rows_and_cells_keep_their_structure() {
        let body = format!(
            "<w:tbl><w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr>\
             <w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl>",
            paragraph("Nome"),
            paragraph("João"),
            paragraph("CPF"),
            paragraph("111.222.333-44"),
        );
        let content = DocxBackend::new()
            .read_bytes(&docx_bytes(&body), &ReadOptions::default())
            .unwrap();
        let SourceContent::Document(blocks) = content else {
            panic!("expected document content");
        };
        assert_eq!(
            blocks,
            vec![BodyBlock::Table(vec![
                vec![vec!["Nome".to_string()], vec!["João".to_string()]],
                vec![vec!["CPF".to_string()], vec!["111.222.333-44".to_string()]],
            ])]
        );
    }

    #[test]
    fn test_paragraphs_and_tables_interleave_in_document_order() {
        let body = format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            paragraph("Dados Destinatario"),
            paragraph("Nome: A"),
            paragraph("fim"),
        );
        let content = DocxBackend::new()
            .read_bytes(&docx_bytes(&body), &ReadOptions::default())
            .unwrap();
        let SourceContent::Document(blocks) = content else {
            panic!("expected document content");
        };
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], BodyBlock::Paragraph(_)));
        assert!(matches!(blocks[1], BodyBlock::Table(_)));
        assert!(matches!(blocks[2], BodyBlock::Paragraph(_)));
    }

    #[test]
    fn test_runs_split_across_tags_join_into_one_paragraph() {
        let body = "<w:p><w:r><w:t>Nome:</w:t></w:r><w:r><w:t xml:space=\"preserve\"> Jo</w:t></w:r>\
                    <w:r><w:t>ão</w:t></w:r></w:p>";
        let content = DocxBackend::new()
            .read_bytes(&docx_bytes(body), &ReadOptions::default())
            .unwrap();
        assert_eq!(
            content,
            SourceContent::Document(vec![BodyBlock::Paragraph("Nome: João".to_string())])
        );
    }

    #[test]
    fn test_tabs_and_breaks_become_spaces() {
        let body = "<w:p><w:r><w:t>Rua A</w:t><w:br/><w:t>Centro</w:t></w:r></w:p>";
        let content = DocxBackend::new()
            .read_bytes(&docx_bytes(body), &ReadOptions::default())
            .unwrap();
        assert_eq!(
            content,
            SourceContent::Document(vec![BodyBlock::Paragraph("Rua A Centro".to_string())])
        );
    }

    #[test]
    fn test_not_a_zip_is_a_parse_error() {
        let result = DocxBackend::new().read_bytes(b"plain text", &ReadOptions::default());
        assert!(matches!(result, Err(EtiquetaError::Parse(_))));
    }

    #[test]
    fn test_zip_without_document_xml_is_a_parse_error() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        let result = DocxBackend::new().read_bytes(&bytes, &ReadOptions::default());
        assert!(matches!(result, Err(EtiquetaError::Parse(_))));
    }
}
