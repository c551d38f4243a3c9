//! Relational sink with a fixed schema
//!
//! A deliberately narrower column set than the full field union: these are
//! the fields the dashboard queries and the document-type report need.
//! Each ingestion run fully replaces the table (drop and recreate, no
//! upsert). Nested values coerce to their textual form before storage; a
//! single failed insert is logged and the batch continues.

use opptrack_common::record::scalar_opt;
use opptrack_common::{OppError, Opportunity, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, warn};

/// Table name for stored opportunities.
pub const TABLE: &str = "opportunities";

/// Fixed column set, in declaration order.
pub const COLUMNS: [&str; 14] = [
    "title",
    "solicitation_number",
    "notice_id",
    "agency",
    "notice_type",
    "base_type",
    "posted_date",
    "response_deadline",
    "naics_code",
    "description",
    "status",
    "classification_code",
    "point_of_contact",
    "ui_link",
];

/// SQLite writer for the fixed-schema opportunity table.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    /// Open (or create) the database file at the given path.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| OppError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// In-memory database, for tests and ephemeral runs.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| OppError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Drop and recreate the table: full-replace semantics per run.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", TABLE))
            .execute(&self.pool)
            .await
            .map_err(|e| OppError::Database(e.to_string()))?;

        let columns = COLUMNS
            .iter()
            .map(|c| format!("{} TEXT", c))
            .collect::<Vec<_>>()
            .join(",\n                ");

        let create = format!(
            "CREATE TABLE {} (\n                id INTEGER PRIMARY KEY AUTOINCREMENT,\n                {}\n            )",
            TABLE, columns
        );

        sqlx::query(&create)
            .execute(&self.pool)
            .await
            .map_err(|e| OppError::Database(e.to_string()))?;

        info!(table = TABLE, "Initialized opportunity table");
        Ok(())
    }

    /// Insert a batch, one record at a time.
    ///
    /// Returns the number of rows actually inserted; a per-record failure
    /// is logged and never aborts the batch.
    pub async fn insert_batch(&self, records: &[Opportunity]) -> Result<usize> {
        let placeholders = vec!["?"; COLUMNS.len()].join(", ");
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            TABLE,
            COLUMNS.join(", "),
            placeholders
        );

        let mut inserted = 0;
        for record in records {
            let mut query = sqlx::query(&insert);
            for value in column_values(record) {
                query = query.bind(value);
            }

            match query.execute(&self.pool).await {
                Ok(_) => inserted += 1,
                Err(e) => {
                    warn!(
                        solicitation = record.solicitation_number().unwrap_or("<none>"),
                        error = %e,
                        "Failed to insert record, continuing"
                    );
                },
            }
        }

        Ok(inserted)
    }

    /// Total stored rows.
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", TABLE))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| OppError::Database(e.to_string()))
    }
}

/// Extract the fixed-column values from an open record.
///
/// Absent fields store as NULL; nested values flatten to JSON text. The
/// notice-type and NAICS columns fall back to the alternate field names the
/// source uses interchangeably.
fn column_values(record: &Opportunity) -> [Option<String>; COLUMNS.len()] {
    let first = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| scalar_opt(record.get(name)))
    };

    [
        scalar_opt(record.get("title")),
        scalar_opt(record.get("solicitationNumber")),
        scalar_opt(record.get("noticeId")),
        scalar_opt(record.get("agency")),
        first(&["type", "noticeType"]),
        scalar_opt(record.get("baseType")),
        scalar_opt(record.get("postedDate")),
        scalar_opt(record.get("responseDeadLine")),
        first(&["naicsCode", "naics"]),
        scalar_opt(record.get("description")),
        scalar_opt(record.get("opportunityStatus")),
        scalar_opt(record.get("classificationCode")),
        scalar_opt(record.get("pointOfContact")),
        scalar_opt(record.get("uiLink")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Opportunity {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_list_value_coerces_to_text() {
        let sink = SqliteSink::open_in_memory().await.unwrap();
        sink.init().await.unwrap();

        let records = vec![record(json!({
            "title": "Attachments galore",
            "solicitationNumber": "SOL-1",
            "pointOfContact": [{"name": "Jane Smith", "email": "jane@example.gov"}],
            "naicsCode": ["541511", "541512"],
        }))];

        assert_eq!(sink.insert_batch(&records).await.unwrap(), 1);

        let naics: Option<String> =
            sqlx::query_scalar("SELECT naics_code FROM opportunities WHERE solicitation_number = 'SOL-1'")
                .fetch_one(sink.pool())
                .await
                .unwrap();

        let naics = naics.unwrap();
        assert!(!naics.is_empty());
        assert!(naics.contains("541511"));

        let contact: Option<String> =
            sqlx::query_scalar("SELECT point_of_contact FROM opportunities WHERE solicitation_number = 'SOL-1'")
                .fetch_one(sink.pool())
                .await
                .unwrap();
        assert!(contact.unwrap().contains("jane@example.gov"));
    }

    #[tokio::test]
    async fn test_bool_and_absent_fields() {
        let sink = SqliteSink::open_in_memory().await.unwrap();
        sink.init().await.unwrap();

        let records = vec![record(json!({
            "solicitationNumber": "SOL-2",
            "active": true,
        }))];
        sink.insert_batch(&records).await.unwrap();

        let title: Option<String> =
            sqlx::query_scalar("SELECT title FROM opportunities WHERE solicitation_number = 'SOL-2'")
                .fetch_one(sink.pool())
                .await
                .unwrap();
        assert_eq!(title, None);
    }

    #[tokio::test]
    async fn test_init_replaces_prior_contents() {
        let sink = SqliteSink::open_in_memory().await.unwrap();
        sink.init().await.unwrap();
        sink.insert_batch(&[record(json!({"solicitationNumber": "SOL-3"}))])
            .await
            .unwrap();
        assert_eq!(sink.count().await.unwrap(), 1);

        sink.init().await.unwrap();
        assert_eq!(sink.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_notice_type_fallback() {
        let sink = SqliteSink::open_in_memory().await.unwrap();
        sink.init().await.unwrap();

        sink.insert_batch(&[
            record(json!({"solicitationNumber": "A", "type": "Solicitation"})),
            record(json!({"solicitationNumber": "B", "noticeType": "Award"})),
        ])
        .await
        .unwrap();

        let types: Vec<Option<String>> =
            sqlx::query_scalar("SELECT notice_type FROM opportunities ORDER BY id")
                .fetch_all(sink.pool())
                .await
                .unwrap();
        assert_eq!(
            types,
            vec![Some("Solicitation".to_string()), Some("Award".to_string())]
        );
    }
}
