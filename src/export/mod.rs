//! Export module for Tidrapport
//!
//! Provides data export in multiple formats:
//! - CSV / TSV: one row per time entry (spreadsheet-compatible)
//! - JSON: the snapshot document, restorable as a backup
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_entries_csv, export_entries_tsv, HEADER as CSV_HEADER};
pub use json::{export_full_json, import_from_json};
pub use yaml::{export_full_yaml, import_from_yaml};
