//! HTTP route handlers
//!
//! Thin request/response mapping over the query store and the document
//! helper. All responses are JSON except the root landing page and raw
//! file downloads.

pub mod analyze;
pub mod documents;
pub mod opportunities;

use crate::{error::ApiResult, AppState};
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/opportunities", get(opportunities::list))
        .route("/api/search", get(opportunities::search))
        .route("/api/columns", get(columns))
        .route("/api/stats", get(stats))
        .route("/api/reload", post(reload))
        .route("/api/documents", get(documents::list_all))
        .route("/api/documents/:solicitation", get(documents::list_for))
        .route("/download/document/*filename", get(documents::download))
        .route("/api/download-docs", post(documents::trigger_download))
        .route("/api/analyze", post(analyze::analyze))
        .with_state(state)
}

/// Minimal HTML landing page with store counters.
async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.read().await;
    let stats = store.stats();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Opptrack Dashboard</title></head>\n<body>\n\
         <h1>Opptrack Dashboard</h1>\n\
         <p>{} opportunities loaded across {} columns from {} data files.</p>\n\
         <p>See <code>/api/opportunities</code>, <code>/api/search</code>, \
         <code>/api/stats</code>.</p>\n\
         </body>\n</html>\n",
        stats.total_opportunities, stats.total_columns, stats.data_files
    ))
}

/// Liveness check with store status.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store.read().await;
    Json(json!({
        "status": "healthy",
        "opportunities": store.len(),
    }))
}

#[derive(Debug, Serialize)]
struct ColumnsResponse {
    columns: Vec<String>,
    total: usize,
}

/// All available columns across loaded files.
async fn columns(State(state): State<AppState>) -> Json<ColumnsResponse> {
    let store = state.store.read().await;
    let columns = store.columns().to_vec();
    let total = columns.len();
    Json(ColumnsResponse { columns, total })
}

/// Aggregate data statistics.
async fn stats(State(state): State<AppState>) -> Json<crate::store::StoreStats> {
    let store = state.store.read().await;
    Json(store.stats())
}

/// Explicitly reload the store from the data directory.
async fn reload(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let mut store = state.store.write().await;
    store.reload()?;

    let stats = store.stats();
    tracing::info!(records = stats.total_opportunities, "Store reloaded via API");

    Ok(Json(json!({
        "success": true,
        "total_opportunities": stats.total_opportunities,
        "total_columns": stats.total_columns,
        "data_files": stats.data_files,
    })))
}
