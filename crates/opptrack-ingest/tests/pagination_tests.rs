//! Adapter and pipeline tests against a mocked search API

use opptrack_ingest::{run, ClientConfig, IngestOptions, SamClient, SearchQuery};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(offset: usize, count: usize) -> Value {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Opportunity {}", offset + i),
                "solicitationNumber": format!("SOL-{:04}", offset + i),
                "naicsCode": "541512",
            })
        })
        .collect();

    json!({ "opportunitiesData": records })
}

async fn client_for(server: &MockServer) -> SamClient {
    let config = ClientConfig::new("test-key").with_base_url(format!("{}/search", server.uri()));
    SamClient::new(config).unwrap()
}

fn query_with_limit(limit: usize) -> SearchQuery {
    SearchQuery {
        limit,
        ..SearchQuery::default()
    }
}

#[tokio::test]
async fn test_three_pages_stop_on_short_page() {
    let server = MockServer::start().await;

    for (offset, count) in [(0usize, 50usize), (50, 50), (100, 12)] {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(offset, count)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server).await;
    let mut pages = client.pages(query_with_limit(50));

    let mut sizes = Vec::new();
    let mut total = 0;
    while let Some(batch) = pages.next_batch().await {
        sizes.push(batch.len());
        total += batch.len();
    }

    // The third page is short (12 < 50), so the sequence stops there: no
    // fourth request is ever made (the mock expectations verify this).
    assert_eq!(sizes, vec![50, 50, 12]);
    assert_eq!(total, 112);
    assert_eq!(pages.pages_fetched(), 3);
}

#[tokio::test]
async fn test_empty_first_page_yields_zero_batches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut pages = client.pages(query_with_limit(50));

    assert!(pages.next_batch().await.is_none());
    assert!(pages.next_batch().await.is_none());
}

#[tokio::test]
async fn test_error_status_terminates_sequence() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut pages = client.pages(query_with_limit(50));

    // Errors never surface as batches; the sequence simply ends.
    assert!(pages.next_batch().await.is_none());
}

#[tokio::test]
async fn test_mid_sequence_error_keeps_earlier_batches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 50)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut pages = client.pages(query_with_limit(50));

    assert_eq!(pages.next_batch().await.map(|b| b.len()), Some(50));
    assert!(pages.next_batch().await.is_none());
}

#[tokio::test]
async fn test_pipeline_persists_every_batch() {
    let server = MockServer::start().await;

    for (offset, count) in [(0usize, 50usize), (50, 50), (100, 12)] {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(offset, count)))
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server).await;
    let options = IngestOptions {
        query: query_with_limit(50),
        data_dir: dir.path().join("data"),
        db_path: dir.path().join("opportunities.db"),
        sample_fallback: false,
    };

    let report = run(&client, &options).await.unwrap();

    assert_eq!(report.batches, 3);
    assert_eq!(report.records, 112);
    assert_eq!(report.rows_inserted, 112);
    assert!(!report.used_sample_data);

    let csv_files: Vec<_> = std::fs::read_dir(dir.path().join("data"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(csv_files.len(), 3);
    assert!(csv_files.iter().any(|f| f == "opportunities_batch_0001.csv"));
}

#[tokio::test]
async fn test_pipeline_sample_fallback_on_empty_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 0)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server).await;
    let options = IngestOptions {
        query: query_with_limit(50),
        data_dir: dir.path().join("data"),
        db_path: dir.path().join("opportunities.db"),
        sample_fallback: true,
    };

    let report = run(&client, &options).await.unwrap();

    assert!(report.used_sample_data);
    assert_eq!(report.records, 5);
    assert_eq!(report.rows_inserted, 5);
}
