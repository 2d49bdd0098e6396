//! Batch pipeline tests over real (generated) containers.

use etiqueta_backend::SourcePipeline;
use etiqueta_core::{ExtractConfig, FieldKey};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let mut body = String::new();
    for text in paragraphs {
        body.push_str(&format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"));
    }
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

#[test]
fn folder_of_documents_extracts_and_deduplicates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("primeiro.docx"),
        docx_with_paragraphs(&[
            "Dados Destinatario",
            "Nome: João da Silva",
            "CPF: 111.222.333-44",
            "Endereço: Rua A, 10",
        ]),
    )
    .unwrap();
    // Same recipient again, different casing, plus a corrupt sibling.
    std::fs::write(
        dir.path().join("segundo.docx"),
        docx_with_paragraphs(&[
            "Dados Destinatario",
            "Nome: JOÃO DA SILVA",
            "CPF: 111.222.333-44",
            "Endereço: RUA A, 10",
        ]),
    )
    .unwrap();
    std::fs::write(dir.path().join("quebrado.docx"), b"not a container").unwrap();

    let pipeline = SourcePipeline::new(&ExtractConfig::default()).unwrap();
    let records = pipeline.run(&[dir.path().to_path_buf()]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get(FieldKey::Nome), Some("João da Silva"));
}

#[test]
fn run_twice_gives_identical_results() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("fonte.docx"),
        docx_with_paragraphs(&[
            "Nome: A",
            "CPF: 1",
            "Endereço: Rua X",
        ]),
    )
    .unwrap();
    let pipeline = SourcePipeline::new(&ExtractConfig::default()).unwrap();
    let inputs = vec![dir.path().to_path_buf()];
    assert_eq!(pipeline.run(&inputs), pipeline.run(&inputs));
}
