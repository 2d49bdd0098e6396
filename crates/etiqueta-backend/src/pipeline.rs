//! Batch orchestration: many sources in, one deduplicated record list out.
//!
//! Every source gets its own scan state and its own failure domain: a
//! source that cannot be read is logged and skipped, never aborting its
//! siblings. Sources run in parallel, but the merge order is fixed by
//! discovery order so deduplication (first occurrence wins) stays
//! deterministic.

use crate::traits::{ReadOptions, SourceBackend, SourceFormat};
use crate::{DocxBackend, XlsxBackend};
use etiqueta_core::{dedup, extract, EtiquetaError, ExtractConfig, KeyResolver, Record, Result, SourceContent};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Runs the extraction pipeline over files and folders.
pub struct SourcePipeline {
    resolver: KeyResolver,
    options: ReadOptions,
}

impl SourcePipeline {
    /// Build a pipeline from the given configuration.
    ///
    /// # Errors
    /// Returns [`EtiquetaError::Config`] when the alias table cannot be
    /// compiled.
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            resolver: KeyResolver::new(&config.aliases)?,
            options: ReadOptions::default().with_data_column(config.data_column),
        })
    }

    /// Extract and deduplicate records from every readable source under the
    /// given inputs (files and/or folders).
    ///
    /// Unreadable sources degrade to warnings; the result only reflects the
    /// sources that could be read.
    #[must_use]
    pub fn run(&self, inputs: &[PathBuf]) -> Vec<Record> {
        let sources = discover_sources(inputs);
        if sources.is_empty() {
            log::warn!("no .xlsx or .docx sources found in the given inputs");
            return Vec::new();
        }

        // Order-preserving collect keeps the merge source-stable.
        let per_source: Vec<Vec<Record>> = sources
            .par_iter()
            .map(|path| self.extract_source(path))
            .collect();

        let records: Vec<Record> = per_source.into_iter().flatten().collect();
        log::info!("{} record(s) collected before deduplication", records.len());
        dedup(records)
    }

    /// Extract one source, degrading any failure to a warning.
    fn extract_source(&self, path: &Path) -> Vec<Record> {
        log::info!("processing {}", path.display());
        match self.try_extract(path) {
            Ok(records) => {
                log::info!("{}: {} record(s)", path.display(), records.len());
                records
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                Vec::new()
            }
        }
    }

    fn try_extract(&self, path: &Path) -> Result<Vec<Record>> {
        let content = read_source(path, &self.options)?;
        Ok(extract(&content, &self.resolver).records)
    }
}

/// Read one source file with the backend matching its extension.
///
/// # Errors
/// Returns [`EtiquetaError::Format`] for unsupported or missing extensions,
/// and the backend's error when the container cannot be read.
pub fn read_source(path: &Path, options: &ReadOptions) -> Result<SourceContent> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            EtiquetaError::Format(format!("no file extension: {}", path.display()))
        })?;
    let format = SourceFormat::from_extension(ext)
        .ok_or_else(|| EtiquetaError::Format(format!("unsupported format: {ext}")))?;

    match format {
        SourceFormat::Docx => DocxBackend::new().read_path(path, options),
        SourceFormat::Xlsx => XlsxBackend::new().read_path(path, options),
    }
}

/// Expand the input list into concrete source files, in a deterministic
/// order: inputs as given, folder contents sorted by name.
fn discover_sources(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            sources.extend(scan_folder(input));
        } else if input.is_file() {
            sources.push(input.clone());
        } else {
            log::warn!("input not found: {}", input.display());
        }
    }
    sources
}

/// Non-recursive scan of one folder for supported source files.
fn scan_folder(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot read folder {}: {e}", dir.display());
            return Vec::new();
        }
    };
    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .and_then(SourceFormat::from_extension)
                    .is_some()
        })
        .collect();
    found.sort();
    if found.is_empty() {
        log::warn!("no .xlsx or .docx files in {}", dir.display());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_folder_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.docx", "a.xlsx", "notes.txt", "c.DOCX"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let found = scan_folder(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.docx", "c.DOCX"]);
    }

    #[test]
    fn test_scan_missing_folder_warns_and_returns_nothing() {
        assert!(scan_folder(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn test_discover_keeps_explicit_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("z.docx");
        let second = dir.path().join("a.docx");
        fs::write(&first, b"x").unwrap();
        fs::write(&second, b"x").unwrap();
        let sources = discover_sources(&[first.clone(), second.clone()]);
        assert_eq!(sources, vec![first, second]);
    }

    #[test]
    fn test_read_source_rejects_unknown_extensions() {
        let result = read_source(Path::new("input.pdf"), &ReadOptions::default());
        assert!(matches!(result, Err(EtiquetaError::Format(_))));
        let result = read_source(Path::new("no_extension"), &ReadOptions::default());
        assert!(matches!(result, Err(EtiquetaError::Format(_))));
    }

    #[test]
    fn test_corrupt_source_degrades_to_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.xlsx");
        fs::write(&bad, b"not a workbook").unwrap();
        let pipeline = SourcePipeline::new(&ExtractConfig::default()).unwrap();
        let records = pipeline.run(&[bad]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_input_list_yields_no_records() {
        let pipeline = SourcePipeline::new(&ExtractConfig::default()).unwrap();
        assert!(pipeline.run(&[]).is_empty());
    }
}
