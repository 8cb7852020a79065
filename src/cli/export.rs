//! CLI command for data export
//!
//! Writes the entry journal to a file in one of the supported formats.

use crate::error::{TidrapportError, TidrapportResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON snapshot document (restorable as a backup)
    Json,
    /// YAML snapshot document, human-readable
    Yaml,
    /// Comma-separated entries (spreadsheet-compatible)
    Csv,
    /// Tab-separated entries
    Tsv,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            _ => None,
        }
    }
}

/// Handle the export command
///
/// Without an explicit format the output file's extension decides, falling
/// back to JSON.
pub fn handle_export_command(
    storage: &Storage,
    output: &Path,
    format: Option<ExportFormat>,
    pretty: bool,
) -> TidrapportResult<()> {
    let format = format
        .or_else(|| ExportFormat::from_path(output))
        .unwrap_or(ExportFormat::Json);

    let file = File::create(output).map_err(|e| {
        TidrapportError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
        ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
        ExportFormat::Csv => csv::export_entries_csv(storage, &mut writer)?,
        ExportFormat::Tsv => csv::export_entries_tsv(storage, &mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| TidrapportError::Export(e.to_string()))?;

    println!(
        "Exported {} entries to: {}",
        storage.entries.count()?,
        output.display()
    );

    Ok(())
}
