//! Stored-document listing, serving, and on-demand retrieval

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use opptrack_ingest::{ClientConfig, DocumentDownloader, SamClient};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One stored document, as listed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub size: u64,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentsResponse {
    pub documents: Vec<DocumentEntry>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solicitation: Option<String>,
}

/// `GET /api/documents` - list every stored document.
pub async fn list_all(State(state): State<AppState>) -> Json<DocumentsResponse> {
    let docs_dir = &state.config.paths.docs_dir;

    let mut documents = scan_descriptions(docs_dir, None);
    documents.extend(scan_attachments(docs_dir, None));

    let total = documents.len();
    Json(DocumentsResponse {
        documents,
        total,
        solicitation: None,
    })
}

/// `GET /api/documents/:solicitation` - documents for one opportunity.
pub async fn list_for(
    State(state): State<AppState>,
    AxumPath(solicitation): AxumPath<String>,
) -> Json<DocumentsResponse> {
    let docs_dir = &state.config.paths.docs_dir;

    let mut documents = scan_descriptions(docs_dir, Some(&solicitation));
    documents.extend(scan_attachments(docs_dir, Some(&solicitation)));

    let total = documents.len();
    Json(DocumentsResponse {
        documents,
        total,
        solicitation: Some(solicitation),
    })
}

/// `GET /download/document/*filename` - serve a stored file.
///
/// The filename may carry one attachment subdirectory level
/// (`SOL-123/spec.pdf`). Traversal sequences and absolute paths are
/// rejected before any filesystem access.
pub async fn download(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> ApiResult<Response> {
    validate_filename(&filename)?;

    let docs_dir = &state.config.paths.docs_dir;
    let candidates = [
        docs_dir.join("descriptions").join(&filename),
        docs_dir.join("attachments").join(&filename),
    ];

    let Some(path) = candidates.iter().find(|p| p.is_file()) else {
        return Err(ApiError::NotFound("Document not found".to_string()));
    };

    let bytes = tokio::fs::read(path).await?;

    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.clone());

    info!(file = %filename, size = bytes.len(), "Serving document");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type(path).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", basename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `POST /api/download-docs` - retrieve documents for one opportunity.
///
/// Accepts either a bare opportunity object or `{"opportunity": {...}}`.
pub async fn trigger_download(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let opportunity = if body.get("solicitationNumber").is_some() {
        &body
    } else {
        body.get("opportunity")
            .ok_or_else(|| ApiError::BadRequest("No opportunity provided".to_string()))?
    };

    let solicitation = opportunity
        .get("solicitationNumber")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("The opportunity must have a solicitationNumber".to_string())
        })?
        .to_string();

    info!(solicitation = %solicitation, "Document retrieval requested");

    let client = SamClient::new(
        ClientConfig::new(state.config.api.api_key.clone())
            .with_base_url(state.config.api.base_url.clone()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut downloader = DocumentDownloader::new(&state.config.paths.docs_dir, client)?;
    let outcome = downloader.run_for(&solicitation).await;

    if let Err(e) = downloader.save_log() {
        warn!(error = %e, "Failed to write download log");
    }

    if !outcome.found {
        return Err(ApiError::BadRequest(format!(
            "Could not fetch opportunity details for '{}'; the solicitation number may be \
             invalid or the opportunity may no longer be available",
            solicitation
        )));
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully downloaded documents for {}", solicitation),
        "solicitation": solicitation,
        "description_saved": outcome.description_saved,
        "attachments_downloaded": outcome.attachments_downloaded,
        "log_location": state.config.paths.docs_dir.join("download_log.json"),
    })))
}

/// Reject traversal sequences and absolute-path markers.
fn validate_filename(filename: &str) -> Result<(), ApiError> {
    if filename.contains("..") || filename.starts_with('/') || filename.contains('\\') {
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }
    Ok(())
}

/// Content type by extension; stored documents are either plain-text
/// descriptions or opaque attachments.
fn content_type(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("txt") => "text/plain; charset=utf-8",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn attachment_doc_type(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("pdf") => "pdf",
        Some("docx") => "docx",
        Some("doc") => "doc",
        _ => "attachment",
    }
}

/// Description files, optionally filtered to one solicitation number.
fn scan_descriptions(docs_dir: &Path, solicitation: Option<&str>) -> Vec<DocumentEntry> {
    let dir = docs_dir.join("descriptions");
    let mut entries = list_files(&dir);
    entries.sort();

    entries
        .iter()
        .filter(|path| extension(path).as_deref() == Some("txt"))
        .filter(|path| matches_solicitation(path, solicitation))
        .filter_map(|path| entry_for(path, "description", None))
        .collect()
}

/// Attachment files, one subdirectory per opportunity.
fn scan_attachments(docs_dir: &Path, solicitation: Option<&str>) -> Vec<DocumentEntry> {
    let dir = docs_dir.join("attachments");
    let mut subdirs: Vec<PathBuf> = match std::fs::read_dir(&dir) {
        Ok(read) => read
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(_) => return Vec::new(),
    };
    subdirs.sort();

    let mut documents = Vec::new();
    for subdir in subdirs {
        let owner = subdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(wanted) = solicitation {
            if owner != wanted {
                continue;
            }
        }

        let mut files = list_files(&subdir);
        files.sort();

        for path in files {
            if let Some(entry) = entry_for(&path, attachment_doc_type(&path), Some(&owner)) {
                documents.push(entry);
            }
        }
    }

    documents
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(read) => read
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn matches_solicitation(path: &Path, solicitation: Option<&str>) -> bool {
    match solicitation {
        None => true,
        Some(wanted) => path
            .file_name()
            .map(|n| n.to_string_lossy().contains(wanted))
            .unwrap_or(false),
    }
}

fn entry_for(path: &Path, doc_type: &str, subdir: Option<&str>) -> Option<DocumentEntry> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    let size = std::fs::metadata(path).ok()?.len();

    let download_path = match subdir {
        Some(owner) => format!("/download/document/{}/{}", owner, name),
        None => format!("/download/document/{}", name),
    };

    Some(DocumentEntry {
        name,
        doc_type: doc_type.to_string(),
        size,
        path: download_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_rejects_traversal() {
        assert!(validate_filename("../secret.txt").is_err());
        assert!(validate_filename("a/../../b").is_err());
        assert!(validate_filename("/etc/passwd").is_err());
        assert!(validate_filename("a\\b").is_err());
        assert!(validate_filename("SOL-1_Title.txt").is_ok());
        assert!(validate_filename("SOL-1/spec.pdf").is_ok());
    }

    #[test]
    fn test_attachment_doc_type() {
        assert_eq!(attachment_doc_type(Path::new("a.PDF")), "pdf");
        assert_eq!(attachment_doc_type(Path::new("a.docx")), "docx");
        assert_eq!(attachment_doc_type(Path::new("a.bin")), "attachment");
    }
}
