//! Opptrack Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Opptrack project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Opptrack workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Records**: The open-mapping opportunity record and its scalar coercion
//! - **Classification**: Keyword-based RFI/RFQ/RFP document-type detection
//! - **Logging**: Centralized tracing configuration
//!
//! # Example
//!
//! ```no_run
//! use opptrack_common::{Result, OppError};
//! use opptrack_common::record::Opportunity;
//!
//! fn title_of(record: &Opportunity) -> Result<&str> {
//!     record
//!         .str_field("title")
//!         .ok_or_else(|| OppError::Parse("record has no title".to_string()))
//! }
//! ```

pub mod doctype;
pub mod error;
pub mod logging;
pub mod record;

// Re-export commonly used types
pub use error::{OppError, Result};
pub use record::Opportunity;
