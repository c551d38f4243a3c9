//! Opptrack Server Library
//!
//! HTTP dashboard over ingested contracting opportunities.
//!
//! # Overview
//!
//! The server reads the CSV files produced by an ingestion run into an
//! in-memory [`store::OpportunityStore`] and serves:
//!
//! - **Listing**: paginated opportunity retrieval
//! - **Search**: category-scoped substring search (keyword, NAICS,
//!   organization)
//! - **Metadata**: column enumeration and aggregate statistics
//! - **Documents**: listing and serving stored descriptions/attachments,
//!   plus an on-demand retrieval trigger
//! - **Analysis**: RFI/RFQ/RFP classification of a single opportunity
//!
//! Ingestion and serving are separate, non-overlapping invocations; the
//! store is read-only except for the explicit reload operation.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework
//! - **Tower / tower-http**: CORS, request tracing, compression layers
//! - **tracing**: structured logging throughout

pub mod config;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod routes;
pub mod store;

use std::sync::Arc;
use tokio::sync::RwLock;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<store::OpportunityStore>>,
    pub config: Arc<config::Config>,
}

impl AppState {
    pub fn new(store: store::OpportunityStore, config: config::Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }
}
