//! Listing and search endpoints

use crate::error::{ApiError, ApiResult};
use crate::pagination::{paginate, Page, PaginationParams};
use crate::store::SearchCategory;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use opptrack_common::Opportunity;
use serde::{Deserialize, Serialize};

/// `GET /api/opportunities?page=1&per_page=10`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Page<Opportunity>>> {
    params
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let store = state.store.read().await;
    Ok(Json(paginate(store.records(), &params)))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search category: keyword, naics, or organization.
    #[serde(rename = "type", default = "default_search_type")]
    pub search_type: String,

    #[serde(default)]
    pub query: String,

    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl SearchParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

fn default_search_type() -> String {
    "keyword".to_string()
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub page: Page<Opportunity>,
    pub query: String,
    pub search_type: String,
}

/// `GET /api/search?type=naics&query=5415&page=1&per_page=10`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let pagination = params.pagination();
    pagination
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let category = SearchCategory::parse(&params.search_type).ok_or_else(|| {
        ApiError::BadRequest(format!("unknown search type '{}'", params.search_type))
    })?;

    let store = state.store.read().await;
    let results = store.search(category, &params.query);

    tracing::debug!(
        search_type = %params.search_type,
        query = %params.query,
        matches = results.len(),
        "Search executed"
    );

    Ok(Json(SearchResponse {
        page: paginate(&results, &pagination),
        query: params.query.to_lowercase(),
        search_type: params.search_type,
    }))
}
