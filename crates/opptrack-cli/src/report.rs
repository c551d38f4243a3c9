//! RFI/RFQ/RFP classification report over the stored opportunities
//!
//! Reads the fixed-schema SQLite table produced by an ingestion run,
//! classifies each record from its title and description, and offers the
//! groupings, statistics, and CSV export the report commands render.

use crate::error::{CliError, Result};
use opptrack_common::doctype::{classify, DocType};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

/// One stored opportunity row, as the report needs it.
#[derive(Debug, Clone)]
pub struct StoredOpportunity {
    pub id: i64,
    pub title: String,
    pub solicitation_number: String,
    pub agency: String,
    pub notice_type: String,
    pub description: String,
    pub posted_date: String,
    pub naics_code: String,
    pub status: String,
    pub ui_link: String,
}

/// A stored opportunity plus its classification.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub opportunity: StoredOpportunity,
    pub doc_type: DocType,
    pub keyword: String,
}

/// Percentage statistics over the classified set.
#[derive(Debug, Clone)]
pub struct ReportStats {
    pub total: usize,
    pub rfi: usize,
    pub rfq: usize,
    pub rfp: usize,
    pub other: usize,
}

impl ReportStats {
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

/// The full classification report.
#[derive(Debug, Default)]
pub struct DocTypeReport {
    rows: Vec<ReportRow>,
}

impl DocTypeReport {
    /// Load and classify every stored opportunity, newest first.
    pub async fn load(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            return Err(CliError::Database(sqlx::Error::Configuration(
                format!("database file '{}' does not exist", db_path.display()).into(),
            )));
        }

        let options = SqliteConnectOptions::new().filename(db_path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let rows = sqlx::query(
            "SELECT id, title, solicitation_number, agency, notice_type, description, \
             posted_date, naics_code, status, ui_link \
             FROM opportunities ORDER BY posted_date DESC",
        )
        .fetch_all(&pool)
        .await?;

        let text = |row: &sqlx::sqlite::SqliteRow, col: &str| -> String {
            row.try_get::<Option<String>, _>(col)
                .ok()
                .flatten()
                .unwrap_or_default()
        };

        let rows = rows
            .iter()
            .map(|row| {
                let opportunity = StoredOpportunity {
                    id: row.try_get("id").unwrap_or_default(),
                    title: text(row, "title"),
                    solicitation_number: text(row, "solicitation_number"),
                    agency: text(row, "agency"),
                    notice_type: text(row, "notice_type"),
                    description: text(row, "description"),
                    posted_date: text(row, "posted_date"),
                    naics_code: text(row, "naics_code"),
                    status: text(row, "status"),
                    ui_link: text(row, "ui_link"),
                };

                let combined = format!("{} {}", opportunity.title, opportunity.description);
                let classification = classify(&combined);

                ReportRow {
                    opportunity,
                    doc_type: classification.doc_type,
                    keyword: classification.keyword,
                }
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one document type, in stored order.
    pub fn filter(&self, doc_type: DocType) -> Vec<&ReportRow> {
        self.rows.iter().filter(|r| r.doc_type == doc_type).collect()
    }

    pub fn stats(&self) -> ReportStats {
        ReportStats {
            total: self.rows.len(),
            rfi: self.filter(DocType::Rfi).len(),
            rfq: self.filter(DocType::Rfq).len(),
            rfp: self.filter(DocType::Rfp).len(),
            other: self.filter(DocType::Solicitation).len(),
        }
    }

    /// Export the classification report with the standard report columns.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record([
            "solicitationNumber",
            "title",
            "agency",
            "document_type",
            "postedDate",
            "opportunityStatus",
            "naics",
            "keyword_match",
        ])?;

        for row in &self.rows {
            let title: String = row.opportunity.title.chars().take(100).collect();
            writer.write_record([
                row.opportunity.solicitation_number.as_str(),
                title.as_str(),
                row.opportunity.agency.as_str(),
                row.doc_type.label(),
                row.opportunity.posted_date.as_str(),
                row.opportunity.status.as_str(),
                row.opportunity.naics_code.as_str(),
                row.keyword.as_str(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Parse a document type name given on the command line.
pub fn parse_doc_type(name: &str) -> Result<DocType> {
    match name.to_lowercase().as_str() {
        "rfi" => Ok(DocType::Rfi),
        "rfq" => Ok(DocType::Rfq),
        "rfp" => Ok(DocType::Rfp),
        "solicitation" | "other" => Ok(DocType::Solicitation),
        _ => Err(CliError::UnknownDocType(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opptrack_ingest::sinks::SqliteSink;
    use serde_json::json;

    async fn seeded_db(dir: &Path) -> std::path::PathBuf {
        let db_path = dir.join("opportunities.db");
        let sink = SqliteSink::open(&db_path).await.unwrap();
        sink.init().await.unwrap();

        let records: Vec<opptrack_common::Opportunity> = serde_json::from_value(json!([
            {
                "title": "Analytics Platform RFP",
                "solicitationNumber": "SOL-1",
                "postedDate": "2026-01-03",
                "description": "Request for Proposal for analytics.",
            },
            {
                "title": "Laptop purchase",
                "solicitationNumber": "SOL-2",
                "postedDate": "2026-01-02",
                "description": "Request for quote for 200 laptops.",
            },
            {
                "title": "Routine maintenance",
                "solicitationNumber": "SOL-3",
                "postedDate": "2026-01-01",
                "description": "Janitorial maintenance contract.",
            }
        ]))
        .unwrap();

        sink.insert_batch(&records).await.unwrap();
        db_path
    }

    #[tokio::test]
    async fn test_report_classifies_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = seeded_db(dir.path()).await;

        let report = DocTypeReport::load(&db_path).await.unwrap();
        assert_eq!(report.rows().len(), 3);

        let stats = report.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.rfp, 1);
        assert_eq!(stats.rfq, 1);
        assert_eq!(stats.other, 1);

        // Newest first by posted date.
        assert_eq!(report.rows()[0].opportunity.solicitation_number, "SOL-1");

        let rfqs = report.filter(DocType::Rfq);
        assert_eq!(rfqs.len(), 1);
        assert_eq!(rfqs[0].keyword, "REQUEST FOR QUOTE");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = seeded_db(dir.path()).await;

        let report = DocTypeReport::load(&db_path).await.unwrap();
        let out = dir.path().join("report.csv");
        report.export_csv(&out).unwrap();

        let body = std::fs::read_to_string(&out).unwrap();
        assert!(body.starts_with("solicitationNumber,title,agency,document_type"));
        assert!(body.contains("SOL-1"));
        assert!(body.contains("RFP"));
    }

    #[tokio::test]
    async fn test_missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DocTypeReport::load(&dir.path().join("absent.db")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_doc_type() {
        assert_eq!(parse_doc_type("RFP").unwrap(), DocType::Rfp);
        assert_eq!(parse_doc_type("rfi").unwrap(), DocType::Rfi);
        assert!(parse_doc_type("banana").is_err());
    }
}
