//! Opptrack Ingest - opportunity ingestion pipeline
//!
//! Pulls contracting-opportunity records from the remote search API and
//! persists them incrementally:
//!
//! - **Client**: paginated search adapter yielding one page of records at a
//!   time, plus the single-item detail lookup
//! - **Flattener**: field-name unions over heterogeneous record batches
//! - **Sinks**: a dynamic-schema CSV writer and a fixed-schema SQLite writer
//! - **Documents**: per-opportunity description and attachment retrieval
//! - **Pipeline**: the batch-at-a-time orchestration with sample-data
//!   fallback when the remote search yields nothing

pub mod client;
pub mod documents;
pub mod flatten;
pub mod pipeline;
pub mod sample;
pub mod sinks;

// Re-export commonly used types
pub use client::{ClientConfig, PageStream, SamClient, SearchQuery};
pub use documents::{DocumentDownloader, DownloadLog};
pub use flatten::FieldUnion;
pub use pipeline::{run, IngestOptions, IngestReport};
