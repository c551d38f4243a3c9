//! Delimited-file sink with a dynamic schema
//!
//! Each write recomputes the field union over the records at hand, writes
//! the sorted header, then one projected row per record. The target file is
//! truncated, so re-running an ingestion replaces prior contents; streaming
//! ingestion writes one numbered file per batch instead.

use crate::flatten::FieldUnion;
use opptrack_common::{OppError, Opportunity, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// CSV writer rooted at a data directory.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Create the sink, ensuring the data directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one batch to its own numbered file under the data directory.
    ///
    /// Returns the path written. An empty batch is skipped rather than
    /// producing a header-only file.
    pub fn write_batch(&self, batch_num: usize, records: &[Opportunity]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            warn!(batch = batch_num, "Skipping empty batch");
            return Ok(None);
        }

        let path = self.dir.join(format!("opportunities_batch_{:04}.csv", batch_num));
        write_records(&path, records)?;
        Ok(Some(path))
    }
}

/// Write records to a single CSV file, truncating any previous contents.
///
/// The header is the sorted field union over all records being written;
/// fields a record lacks render as empty cells.
pub fn write_records(path: &Path, records: &[Opportunity]) -> Result<()> {
    let union = FieldUnion::from_records(records);

    let mut writer = csv::Writer::from_path(path).map_err(|e| OppError::Csv(e.to_string()))?;

    writer
        .write_record(union.names())
        .map_err(|e| OppError::Csv(e.to_string()))?;

    for record in records {
        writer
            .write_record(union.project(record))
            .map_err(|e| OppError::Csv(e.to_string()))?;
    }

    writer.flush()?;

    info!(
        path = %path.display(),
        records = records.len(),
        fields = union.len(),
        "Wrote CSV file"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Opportunity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_field_union() {
        let records = vec![
            record(json!({"title": "A", "naicsCode": "541511"})),
            record(json!({"title": "B", "agency": "GSA", "postedDate": "01/02/2026"})),
            record(json!({"noticeId": "n-1"})),
        ];
        let expected_union = FieldUnion::from_records(&records);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&path, &records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            expected_union.names().map(String::from).collect::<Vec<_>>()
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), records.len());

        // Every row is total over the union.
        for row in &rows {
            assert_eq!(row.len(), expected_union.len());
        }
    }

    #[test]
    fn test_write_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_records(&path, &[record(json!({"title": "first"})), record(json!({"title": "second"}))])
            .unwrap();
        write_records(&path, &[record(json!({"title": "only"}))]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_batch_files_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path()).unwrap();

        let path = sink
            .write_batch(3, &[record(json!({"title": "A"}))])
            .unwrap()
            .unwrap();
        assert!(path.ends_with("opportunities_batch_0003.csv"));

        assert!(sink.write_batch(4, &[]).unwrap().is_none());
    }
}
