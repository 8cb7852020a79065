//! JSON Export functionality
//!
//! Exports the journal and pay settings as a snapshot document. The output
//! can be copied into the backup directory and restored like any snapshot.

use crate::error::{TidrapportError, TidrapportResult};
use crate::storage::serializer::SnapshotDocument;
use crate::storage::Storage;
use std::io::Write;

/// Export the full journal to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> TidrapportResult<()> {
    let document = SnapshotDocument::new(&storage.entries.get_all()?, &storage.settings.pay);

    if pretty {
        serde_json::to_writer_pretty(writer, &document)
    } else {
        serde_json::to_writer(writer, &document)
    }
    .map_err(|e| TidrapportError::Export(e.to_string()))?;

    Ok(())
}

/// Parse a JSON export back into a document
pub fn import_from_json(json_str: &str) -> TidrapportResult<SnapshotDocument> {
    let document: SnapshotDocument = serde_json::from_str(json_str)
        .map_err(|e| TidrapportError::CorruptData(e.to_string()))?;

    document.validate().map_err(TidrapportError::CorruptData)?;

    Ok(document)
}
