//! Document retrieval tests against a mocked API

use opptrack_ingest::{ClientConfig, DocumentDownloader, SamClient};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn downloader_for(server: &MockServer, output: &std::path::Path) -> DocumentDownloader {
    let config = ClientConfig::new("test-key").with_base_url(format!("{}/search", server.uri()));
    let client = SamClient::new(config).unwrap();
    DocumentDownloader::new(output, client).unwrap()
}

#[tokio::test]
async fn test_run_with_one_failing_attachment() {
    let server = MockServer::start().await;

    let detail = json!({
        "opportunitiesData": [{
            "title": "Data Center Support",
            "solicitationNumber": "SOL-77",
            "agency": "GSA",
            "description": "Support services for two data centers.",
            "attachments": [
                {"url": format!("{}/files/sow.pdf", server.uri()), "filename": "sow.pdf"},
                {"url": format!("{}/files/missing.pdf", server.uri()), "filename": "missing.pdf"},
            ],
        }]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("solicitationNumber", "SOL-77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/sow.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 fake".to_vec()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut downloader = downloader_for(&server, dir.path()).await;

    let outcome = downloader.run_for("SOL-77").await;

    // One attachment succeeds, one 404s; the run still succeeds overall.
    assert!(outcome.found);
    assert!(outcome.description_saved);
    assert_eq!(outcome.attachments_downloaded, 1);

    let log = downloader.log();
    assert_eq!(log.total_opportunities, 1);
    assert_eq!(log.descriptions_saved, 1);
    assert_eq!(log.attachments_downloaded, 1);
    assert_eq!(log.errors.len(), 1);
    assert_eq!(log.errors[0].action, "download_attachment");
    assert_eq!(log.errors[0].file.as_deref(), Some("missing.pdf"));

    // Description and attachment land in the content directory tree.
    let descriptions: Vec<_> = std::fs::read_dir(dir.path().join("descriptions"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(descriptions.len(), 1);
    assert!(descriptions[0].starts_with("SOL-77_"));

    assert!(dir.path().join("attachments/SOL-77/sow.pdf").exists());
    assert!(!dir.path().join("attachments/SOL-77/missing.pdf").exists());

    let log_path = downloader.save_log().unwrap();
    assert!(log_path.ends_with("download_log.json"));
    let body = std::fs::read_to_string(log_path).unwrap();
    assert!(body.contains("\"attachments_downloaded\": 1"));
}

#[tokio::test]
async fn test_unknown_identifier_is_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"opportunitiesData": []})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut downloader = downloader_for(&server, dir.path()).await;

    let outcome = downloader.run_for("NO-SUCH").await;
    assert!(!outcome.found);
    assert!(!outcome.description_saved);
    assert_eq!(outcome.attachments_downloaded, 0);
}

#[tokio::test]
async fn test_attachment_cap() {
    let server = MockServer::start().await;

    let attachments: Vec<_> = (0..8)
        .map(|i| {
            json!({
                "url": format!("{}/files/doc{}.pdf", server.uri(), i),
                "filename": format!("doc{}.pdf", i),
            })
        })
        .collect();

    let detail = json!({
        "opportunitiesData": [{
            "title": "Many attachments",
            "solicitationNumber": "SOL-88",
            "attachments": attachments,
        }]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .mount(&server)
        .await;

    for i in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/files/doc{}.pdf", i)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 16]))
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut downloader = downloader_for(&server, dir.path()).await;

    let outcome = downloader.run_for("SOL-88").await;
    assert_eq!(
        outcome.attachments_downloaded,
        opptrack_ingest::documents::MAX_ATTACHMENTS_PER_OPPORTUNITY
    );
}
