//! Per-opportunity document retrieval
//!
//! Fetches authoritative detail for an opportunity, renders its description
//! to a text file, and streams any advertised attachments to disk under a
//! per-opportunity subdirectory. Every failure is caught, recorded in the
//! [`DownloadLog`], and skipped; a retrieval run never aborts on a single
//! bad item.
//!
//! Content directory layout:
//!
//! ```text
//! <output>/descriptions/<identifier>_<truncated-title>.txt
//! <output>/attachments/<identifier>/<filename>
//! <output>/download_log.json
//! ```

use crate::client::SamClient;
use chrono::Utc;
use opptrack_common::{Opportunity, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Cap on attachments fetched per opportunity.
pub const MAX_ATTACHMENTS_PER_OPPORTUNITY: usize = 5;

/// Attachment download timeout in seconds.
const ATTACHMENT_TIMEOUT_SECS: u64 = 30;

/// One error entry in the download log.
#[derive(Debug, Clone, Serialize)]
pub struct LogError {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub error: String,
    pub action: String,
}

/// One per-opportunity entry in the download log.
#[derive(Debug, Clone, Serialize)]
pub struct LogDetail {
    pub solicitation_number: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    pub description_saved: bool,
    pub attachments_found: usize,
}

/// Accumulating record of a single retrieval run.
///
/// Written once at the end of a run as `download_log.json`; a write-only
/// artifact for humans, never read back programmatically.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadLog {
    pub timestamp: String,
    pub total_opportunities: usize,
    pub descriptions_saved: usize,
    pub attachments_downloaded: usize,
    pub errors: Vec<LogError>,
    pub details: Vec<LogDetail>,
}

impl DownloadLog {
    fn new() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            total_opportunities: 0,
            descriptions_saved: 0,
            attachments_downloaded: 0,
            errors: Vec::new(),
            details: Vec::new(),
        }
    }
}

/// Outcome of a single-opportunity retrieval, reported to API callers.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub found: bool,
    pub description_saved: bool,
    pub attachments_downloaded: usize,
}

/// Downloads descriptions and attachments for opportunities.
pub struct DocumentDownloader {
    api: SamClient,
    http: Client,
    output_dir: PathBuf,
    descriptions_dir: PathBuf,
    attachments_dir: PathBuf,
    max_per_opportunity: usize,
    log: DownloadLog,
}

impl DocumentDownloader {
    /// Create a downloader rooted at `output_dir`, creating the content
    /// directory tree. Failure to create the tree is the one fatal error
    /// in this module.
    pub fn new(output_dir: impl Into<PathBuf>, api: SamClient) -> Result<Self> {
        let output_dir = output_dir.into();
        let descriptions_dir = output_dir.join("descriptions");
        let attachments_dir = output_dir.join("attachments");

        std::fs::create_dir_all(&descriptions_dir)?;
        std::fs::create_dir_all(&attachments_dir)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(ATTACHMENT_TIMEOUT_SECS))
            .user_agent("opptrack-documents/0.1")
            .build()
            .map_err(|e| opptrack_common::OppError::Network(e.to_string()))?;

        Ok(Self {
            api,
            http,
            output_dir,
            descriptions_dir,
            attachments_dir,
            max_per_opportunity: MAX_ATTACHMENTS_PER_OPPORTUNITY,
            log: DownloadLog::new(),
        })
    }

    pub fn with_max_per_opportunity(mut self, max: usize) -> Self {
        self.max_per_opportunity = max;
        self
    }

    pub fn log(&self) -> &DownloadLog {
        &self.log
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Retrieve documents for a single identifier: detail lookup, then
    /// description, then attachments.
    pub async fn run_for(&mut self, solicitation_number: &str) -> RunOutcome {
        self.log.total_opportunities += 1;

        let Some(details) = self.fetch_details(solicitation_number).await else {
            return RunOutcome {
                found: false,
                description_saved: false,
                attachments_downloaded: 0,
            };
        };

        let description_saved = self.save_description(&details);
        let attachments_downloaded = self
            .download_attachments(solicitation_number, &details)
            .await;

        self.push_detail(solicitation_number, &details, description_saved);

        RunOutcome {
            found: true,
            description_saved,
            attachments_downloaded,
        }
    }

    /// Retrieve documents for a list of already-fetched records.
    ///
    /// The description comes from the record at hand; the detail lookup is
    /// only used to discover attachments.
    pub async fn process_list(&mut self, opportunities: &[Opportunity]) {
        self.log.total_opportunities += opportunities.len();

        for (idx, opp) in opportunities.iter().enumerate() {
            let identifier = opp
                .solicitation_number()
                .map(String::from)
                .unwrap_or_else(|| format!("OPP_{}", idx + 1));

            info!(identifier = %identifier, "Retrieving documents");

            let description_saved = self.save_description(opp);

            if let Some(details) = self.fetch_details(&identifier).await {
                self.download_attachments(&identifier, &details).await;
                self.push_detail(&identifier, opp, description_saved);
            } else {
                self.push_detail(&identifier, opp, description_saved);
            }
        }
    }

    /// Fetch authoritative detail for an identifier; errors and misses are
    /// logged, never raised.
    async fn fetch_details(&mut self, solicitation_number: &str) -> Option<Opportunity> {
        match self.api.detail(solicitation_number).await {
            Ok(found) => {
                if found.is_none() {
                    warn!(identifier = solicitation_number, "No detail record found");
                }
                found
            },
            Err(e) => {
                warn!(identifier = solicitation_number, error = %e, "Detail lookup failed");
                self.log.errors.push(LogError {
                    identifier: solicitation_number.to_string(),
                    file: None,
                    error: e.to_string(),
                    action: "get_opportunity_details".to_string(),
                });
                None
            },
        }
    }

    /// Render and save the fixed-template description document.
    pub fn save_description(&mut self, opportunity: &Opportunity) -> bool {
        let identifier = opportunity.solicitation_number().unwrap_or("UNKNOWN");
        let filename = description_filename(opportunity);
        let path = self.descriptions_dir.join(&filename);

        match std::fs::write(&path, render_description(opportunity)) {
            Ok(()) => {
                self.log.descriptions_saved += 1;
                info!(path = %path.display(), "Saved description");
                true
            },
            Err(e) => {
                warn!(identifier, error = %e, "Failed to save description");
                self.log.errors.push(LogError {
                    identifier: identifier.to_string(),
                    file: Some(filename),
                    error: e.to_string(),
                    action: "save_description".to_string(),
                });
                false
            },
        }
    }

    /// Download the attachments advertised by a detail record, capped at
    /// `max_per_opportunity`. Returns the number downloaded.
    async fn download_attachments(&mut self, identifier: &str, details: &Opportunity) -> usize {
        let Some(Value::Array(attachments)) = details.get("attachments") else {
            return 0;
        };

        let mut downloaded = 0;
        for (idx, descriptor) in attachments.iter().take(self.max_per_opportunity).enumerate() {
            let (url, filename) = match descriptor {
                // Descriptors are usually objects with url and an optional
                // filename; a bare string is treated as the URL.
                Value::Object(map) => {
                    let Some(url) = map.get("url").and_then(Value::as_str) else {
                        continue;
                    };
                    let filename = map
                        .get("filename")
                        .and_then(Value::as_str)
                        .map(String::from)
                        .unwrap_or_else(|| format!("attachment_{}", idx + 1));
                    (url.to_string(), filename)
                },
                Value::String(url) => (url.clone(), format!("attachment_{}", idx + 1)),
                _ => continue,
            };

            if self.download_attachment(&url, identifier, &filename).await {
                downloaded += 1;
            }
        }

        downloaded
    }

    /// Download a single attachment to `attachments/<identifier>/`.
    async fn download_attachment(&mut self, url: &str, identifier: &str, filename: &str) -> bool {
        let safe_name = sanitize_component(filename);
        let dir = self.attachments_dir.join(sanitize_component(identifier));

        let result: Result<()> = async {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| opptrack_common::OppError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(opptrack_common::OppError::Network(format!(
                    "HTTP {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| opptrack_common::OppError::Network(e.to_string()))?;

            std::fs::create_dir_all(&dir)?;
            std::fs::write(dir.join(&safe_name), &bytes)?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                self.log.attachments_downloaded += 1;
                info!(identifier, file = %safe_name, "Downloaded attachment");
                true
            },
            Err(e) => {
                warn!(identifier, file = %safe_name, error = %e, "Attachment download failed");
                self.log.errors.push(LogError {
                    identifier: identifier.to_string(),
                    file: Some(safe_name),
                    error: e.to_string(),
                    action: "download_attachment".to_string(),
                });
                false
            },
        }
    }

    fn push_detail(&mut self, identifier: &str, opportunity: &Opportunity, description_saved: bool) {
        let attachments_found = match opportunity.get("attachments") {
            Some(Value::Array(list)) => list.len(),
            _ => 0,
        };

        self.log.details.push(LogDetail {
            solicitation_number: identifier.to_string(),
            title: opportunity.text_field("title"),
            agency: opportunity.str_field("agency").map(String::from),
            description_saved,
            attachments_found,
        });
    }

    /// Serialize the accumulated log as `download_log.json`.
    pub fn save_log(&self) -> Result<PathBuf> {
        let path = self.output_dir.join("download_log.json");
        let body = serde_json::to_string_pretty(&self.log)?;
        std::fs::write(&path, body)?;
        Ok(path)
    }
}

/// Strip path separators from a user- or source-controlled name so it can
/// never escape the content directory.
fn sanitize_component(name: &str) -> String {
    name.replace(['/', '\\'], "_").replace("..", "_")
}

/// `<identifier>_<title up to 50 chars>.txt`
fn description_filename(opportunity: &Opportunity) -> String {
    let identifier = opportunity.solicitation_number().unwrap_or("UNKNOWN");
    let title: String = opportunity
        .str_field("title")
        .unwrap_or("Untitled")
        .chars()
        .take(50)
        .collect();

    sanitize_component(&format!("{}_{}", identifier, title)) + ".txt"
}

/// The fixed description template.
fn render_description(opportunity: &Opportunity) -> String {
    let field = |name: &str| {
        let text = opportunity.text_field(name);
        if text.is_empty() {
            "N/A".to_string()
        } else {
            text
        }
    };

    let description = opportunity
        .str_field("description")
        .unwrap_or("No description available");

    format!(
        "================================================================================\n\
         OPPORTUNITY DETAILS\n\
         ================================================================================\n\
         \n\
         Title: {title}\n\
         Solicitation Number: {solicitation}\n\
         Agency: {agency}\n\
         Notice ID: {notice_id}\n\
         Type: {notice_type}\n\
         Status: {status}\n\
         Posted Date: {posted}\n\
         NAICS Code: {naics}\n\
         Classification Code: {classification}\n\
         \n\
         ================================================================================\n\
         DESCRIPTION\n\
         ================================================================================\n\
         \n\
         {description}\n\
         \n\
         ================================================================================\n\
         ADDITIONAL INFORMATION\n\
         ================================================================================\n\
         \n\
         Point of Contact: {contact}\n\
         \n\
         Link: {link}\n\
         \n\
         Generated: {generated}\n",
        title = field("title"),
        solicitation = field("solicitationNumber"),
        agency = field("agency"),
        notice_id = field("noticeId"),
        notice_type = field("type"),
        status = field("opportunityStatus"),
        posted = field("postedDate"),
        naics = field("naicsCode"),
        classification = field("classificationCode"),
        description = description,
        contact = field("pointOfContact"),
        link = field("uiLink"),
        generated = Utc::now().format("%Y-%m-%d %H:%M:%S"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Opportunity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_component("../etc/passwd"), "__etc_passwd");
        assert_eq!(sanitize_component("plain.pdf"), "plain.pdf");
    }

    #[test]
    fn test_description_filename_truncates_title() {
        let opp = record(json!({
            "solicitationNumber": "SOL-9",
            "title": "x".repeat(200),
        }));
        let name = description_filename(&opp);
        assert!(name.starts_with("SOL-9_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "SOL-9_".len() + 50 + ".txt".len());
    }

    #[test]
    fn test_render_description_substitutes_missing_fields() {
        let opp = record(json!({"solicitationNumber": "SOL-9"}));
        let body = render_description(&opp);
        assert!(body.contains("Solicitation Number: SOL-9"));
        assert!(body.contains("Title: N/A"));
        assert!(body.contains("No description available"));
    }
}
