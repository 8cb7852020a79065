//! YAML Export functionality
//!
//! Human-readable rendering of the same document as the JSON export.

use crate::error::{TidrapportError, TidrapportResult};
use crate::storage::serializer::SnapshotDocument;
use crate::storage::Storage;
use std::io::Write;

/// Export the full journal to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> TidrapportResult<()> {
    let document = SnapshotDocument::new(&storage.entries.get_all()?, &storage.settings.pay);

    let header = format!(
        "# Tidrapport export\n# Generated: {}\n# App Version: {}\n\n",
        document.created_at, document.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| TidrapportError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &document).map_err(|e| TidrapportError::Export(e.to_string()))?;

    Ok(())
}

/// Parse a YAML export back into a document
pub fn import_from_yaml(yaml_str: &str) -> TidrapportResult<SnapshotDocument> {
    let document: SnapshotDocument = serde_yaml::from_str(yaml_str)
        .map_err(|e| TidrapportError::CorruptData(e.to_string()))?;

    document.validate().map_err(TidrapportError::CorruptData)?;

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TidrapportPaths;
    use crate::models::TimeEntry;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TidrapportPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let mut entry = TimeEntry::new(NaiveDate::from_ymd_opt(2025, 6, 6).unwrap());
        entry.red_day = true;
        storage.entries.upsert(entry.clone()).unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let yaml_string = String::from_utf8(output).unwrap();

        assert!(yaml_string.starts_with("# Tidrapport export"));
        assert!(yaml_string.contains("red_day: true"));

        // Comment lines are valid YAML, so the whole file parses
        let imported = import_from_yaml(&yaml_string).unwrap();
        assert_eq!(imported.entries, vec![entry]);
    }
}
