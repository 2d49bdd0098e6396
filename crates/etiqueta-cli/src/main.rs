//! Command-line label sheet generator.
//!
//! Reads recipient data out of `.xlsx`/`.docx` sources, deduplicates the
//! records, and writes a printable A4 label sheet.

use anyhow::{Context, Result};
use clap::Parser;
use etiqueta_backend::SourcePipeline;
use etiqueta_core::{layout, ExtractConfig};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "etiqueta",
    version,
    about = "Extracts recipient records from .xlsx/.docx sources and lays them out as a printable label sheet"
)]
struct Cli {
    /// Input files (.xlsx, .docx) and/or folders containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output .docx path
    #[arg(short, long, default_value = "etiquetas.docx")]
    output: PathBuf,

    /// TOML file overriding the alias table, label geometry or data column
    #[arg(long)]
    config: Option<PathBuf>,

    /// Zero-based spreadsheet column holding the record data
    #[arg(long)]
    column: Option<usize>,
}

/// Load the configuration file if given, then apply flag overrides.
fn load_config(path: Option<&Path>, column: Option<usize>) -> Result<ExtractConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ExtractConfig::default(),
    };
    if let Some(column) = column {
        config.data_column = column;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.column)?;
    let geometry = config.geometry;

    let pipeline = SourcePipeline::new(&config).context("unusable alias table")?;
    let records = pipeline.run(&cli.inputs);

    let Some(grid) = layout(&records, &geometry) else {
        log::info!("nothing to generate: no valid records survived extraction");
        return Ok(());
    };
    etiqueta_render::render_to_file(&grid, &cli.output)
        .with_context(|| format!("cannot write {}", cli.output.display()))?;
    Ok(())
}
