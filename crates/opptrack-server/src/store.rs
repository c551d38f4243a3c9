//! In-memory query store over ingested CSV files
//!
//! The dashboard's read layer: loads every CSV file in the data directory
//! at startup, keeps records in file-then-row order, and answers the
//! pagination/search/stats queries. The store is an explicit instance owned
//! by the process; `reload` replaces its contents from disk on demand.

use opptrack_common::{OppError, Opportunity, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Search categories the dashboard exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCategory {
    /// Substring over the title field.
    Keyword,
    /// Substring over the NAICS code fields.
    Naics,
    /// Substring over the organization-ish fields.
    Organization,
}

impl SearchCategory {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "keyword" => Some(Self::Keyword),
            "naics" => Some(Self::Naics),
            "organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

/// Fields scanned by the organization search.
const ORGANIZATION_FIELDS: [&str; 3] =
    ["organizationType", "fullParentPathName", "officeAddress"];

/// Aggregate statistics for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_opportunities: usize,
    pub total_columns: usize,
    pub data_files: usize,
}

/// The in-memory mirror of the ingested CSV files.
#[derive(Debug, Default)]
pub struct OpportunityStore {
    data_dir: PathBuf,
    records: Vec<Opportunity>,
    columns: Vec<String>,
    source_files: usize,
}

impl OpportunityStore {
    /// Load all CSV files from the data directory, in filename order.
    ///
    /// A missing directory yields an empty store rather than an error: the
    /// dashboard still serves, reporting zero records.
    pub fn load(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            data_dir: data_dir.into(),
            ..Self::default()
        };
        store.reload()?;
        Ok(store)
    }

    /// Replace the store's contents from disk.
    pub fn reload(&mut self) -> Result<()> {
        self.records.clear();
        self.columns.clear();
        self.source_files = 0;

        if !self.data_dir.exists() {
            warn!(dir = %self.data_dir.display(), "Data directory does not exist, store is empty");
            return Ok(());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.data_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        let mut columns = BTreeSet::new();

        for path in &paths {
            match self.read_file(path, &mut columns) {
                Ok(count) => {
                    self.source_files += 1;
                    info!(file = %path.display(), records = count, "Loaded CSV file");
                },
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable CSV file");
                },
            }
        }

        self.columns = columns.into_iter().collect();

        info!(
            records = self.records.len(),
            columns = self.columns.len(),
            files = self.source_files,
            "Store loaded"
        );

        Ok(())
    }

    fn read_file(&mut self, path: &Path, columns: &mut BTreeSet<String>) -> Result<usize> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| OppError::Csv(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| OppError::Csv(e.to_string()))?
            .clone();

        for header in headers.iter() {
            columns.insert(header.to_string());
        }

        let mut count = 0;
        for row in reader.records() {
            let row = row.map_err(|e| OppError::Csv(e.to_string()))?;
            self.records
                .push(Opportunity::from_pairs(headers.iter().zip(row.iter())));
            count += 1;
        }

        Ok(count)
    }

    pub fn records(&self) -> &[Opportunity] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted union of every loaded header.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_opportunities: self.records.len(),
            total_columns: self.columns.len(),
            data_files: self.source_files,
        }
    }

    /// Category-scoped, case-insensitive substring search.
    ///
    /// Results keep insertion order; there is no tokenization or ranking.
    /// The organization category deduplicates by whole-record value
    /// equality, since one record can match several fields.
    pub fn search(&self, category: SearchCategory, query: &str) -> Vec<Opportunity> {
        let needle = query.to_lowercase();

        match category {
            SearchCategory::Keyword => self
                .records
                .iter()
                .filter(|o| o.text_field("title").to_lowercase().contains(&needle))
                .cloned()
                .collect(),

            SearchCategory::Naics => self
                .records
                .iter()
                .filter(|o| {
                    o.text_field("naicsCode").to_lowercase().contains(&needle)
                        || o.text_field("naicsCodes").to_lowercase().contains(&needle)
                })
                .cloned()
                .collect(),

            SearchCategory::Organization => {
                let mut results: Vec<Opportunity> = Vec::new();
                for record in &self.records {
                    let matched = ORGANIZATION_FIELDS
                        .iter()
                        .any(|field| record.text_field(field).to_lowercase().contains(&needle));

                    if matched && !results.contains(record) {
                        results.push(record.clone());
                    }
                }
                results
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Opportunity {
        serde_json::from_value(value).unwrap()
    }

    fn store_with(records: Vec<Opportunity>) -> OpportunityStore {
        OpportunityStore {
            data_dir: PathBuf::from("unused"),
            columns: records
                .iter()
                .flat_map(|r| r.field_names().map(String::from))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            source_files: 1,
            records,
        }
    }

    fn naics_fixture() -> OpportunityStore {
        store_with(vec![
            record(json!({"title": "A", "naicsCode": "541512"})),
            record(json!({"title": "B", "naicsCode": "236220"})),
            record(json!({"title": "C", "naicsCode": "541511"})),
            record(json!({"title": "D", "naicsCode": "541330"})),
            record(json!({"title": "E", "naicsCodes": "541519"})),
        ])
    }

    #[test]
    fn test_naics_search_preserves_insertion_order() {
        let store = naics_fixture();
        let results = store.search(SearchCategory::Naics, "5415");

        assert_eq!(results.len(), 3);
        let titles: Vec<_> = results.iter().map(|r| r.text_field("title")).collect();
        assert_eq!(titles, vec!["A", "C", "E"]);
    }

    #[test]
    fn test_keyword_search_is_case_insensitive() {
        let store = store_with(vec![
            record(json!({"title": "Cloud Migration RFP"})),
            record(json!({"title": "Janitorial services"})),
        ]);

        let results = store.search(SearchCategory::Keyword, "CLOUD");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_organization_search_dedups_multi_field_matches() {
        // Both organization fields contain the needle; the record must
        // appear once.
        let store = store_with(vec![record(json!({
            "title": "T",
            "organizationType": "FEDERAL AGENCY",
            "fullParentPathName": "FEDERAL.GSA.REGION1",
        }))]);

        let results = store.search(SearchCategory::Organization, "federal");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_missing_data_dir_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let store = OpportunityStore::load(missing).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.stats().data_files, 0);
    }

    #[test]
    fn test_load_unions_columns_across_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.csv"),
            "naicsCode,title\n541512,First\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.csv"),
            "agency,title\nGSA,Second\n",
        )
        .unwrap();

        let store = OpportunityStore::load(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.columns(), &["agency", "naicsCode", "title"]);
        assert_eq!(store.stats().data_files, 2);

        // File order (by name) decides insertion order.
        assert_eq!(store.records()[0].text_field("title"), "First");
        assert_eq!(store.records()[1].text_field("title"), "Second");
    }
}
