//! CSV and TSV export
//!
//! One row per time entry under a fixed Swedish header. Pay columns use two
//! decimals with a dot separator so spreadsheets parse them as numbers.

use crate::error::{TidrapportError, TidrapportResult};
use crate::models::TimeEntry;
use crate::storage::Storage;
use std::io::Write;

/// Column header shared by the CSV and TSV exports
pub const HEADER: [&str; 11] = [
    "Datum",
    "Veckodag",
    "Start",
    "Slut",
    "Rast (min)",
    "Arbetade timmar",
    "Bruttolön",
    "Skatt",
    "Nettolön",
    "Röd dag",
    "Sjukdag",
];

/// Export all entries as comma-separated values
pub fn export_entries_csv<W: Write>(storage: &Storage, writer: W) -> TidrapportResult<()> {
    write_delimited(&storage.entries.get_all()?, writer, b',')
}

/// Export all entries as tab-separated values
pub fn export_entries_tsv<W: Write>(storage: &Storage, writer: W) -> TidrapportResult<()> {
    write_delimited(&storage.entries.get_all()?, writer, b'\t')
}

/// Write entries with the given field delimiter
pub fn write_delimited<W: Write>(
    entries: &[TimeEntry],
    writer: W,
    delimiter: u8,
) -> TidrapportResult<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(HEADER)
        .map_err(|e| TidrapportError::Export(e.to_string()))?;

    for entry in entries {
        out.write_record(entry_row(entry))
            .map_err(|e| TidrapportError::Export(e.to_string()))?;
    }

    out.flush()
        .map_err(|e| TidrapportError::Export(e.to_string()))?;
    Ok(())
}

fn entry_row(entry: &TimeEntry) -> [String; 11] {
    let time = |t: Option<chrono::NaiveTime>| {
        t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
    };

    [
        entry.date.format("%Y-%m-%d").to_string(),
        entry.weekday_name().to_string(),
        time(entry.start_time),
        time(entry.end_time),
        entry.break_minutes.to_string(),
        format!("{:.2}", entry.worked_hours()),
        entry.gross_pay.to_decimal_string(),
        entry.tax.to_decimal_string(),
        entry.net_pay.to_decimal_string(),
        yes_no(entry.red_day).to_string(),
        yes_no(entry.sick_day).to_string(),
    ]
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Ja"
    } else {
        "Nej"
    }
}
