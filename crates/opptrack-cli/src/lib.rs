//! Opptrack CLI Library
//!
//! Command-line interface for the opportunity tracker:
//!
//! - **Ingestion**: fetch and persist opportunities (`opptrack fetch`)
//! - **Reporting**: RFI/RFQ/RFP breakdown of the stored data
//!   (`opptrack report`)
//! - **Export**: classification report as CSV (`opptrack export`)
//! - **NAICS**: code catalog listing and live discovery (`opptrack naics`)
//! - **Documents**: description/attachment retrieval for specific
//!   solicitations (`opptrack download`)

pub mod commands;
pub mod error;
pub mod naics;
pub mod report;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use opptrack_ingest::client;

/// Opptrack - contracting-opportunity tracker
#[derive(Parser, Debug)]
#[command(name = "opptrack")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Search API base URL
    #[arg(long, env = "SAM_API_URL", default_value = client::DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Search API key
    #[arg(long, env = "SAM_API_KEY", default_value = "", global = true)]
    pub api_key: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch opportunities from the remote API and persist them
    Fetch {
        /// Free-text search keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// NAICS code filters (repeatable)
        #[arg(short, long)]
        naics: Vec<String>,

        /// Agency filters (repeatable)
        #[arg(short, long)]
        agency: Vec<String>,

        /// Records per page
        #[arg(long, default_value_t = client::DEFAULT_PAGE_SIZE)]
        limit: usize,

        /// Directory for per-batch CSV files
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// SQLite database file
        #[arg(long, default_value = "./opportunities.db")]
        db: String,

        /// Disable the sample-data fallback on an empty search
        #[arg(long)]
        no_sample_fallback: bool,
    },

    /// Show the RFI/RFQ/RFP breakdown of stored opportunities
    Report {
        /// Limit to one document type (rfi, rfq, rfp, solicitation)
        #[arg(short, long)]
        doc_type: Option<String>,

        /// Show percentage statistics instead of listings
        #[arg(short, long)]
        stats: bool,

        /// SQLite database file
        #[arg(long, default_value = "./opportunities.db")]
        db: String,
    },

    /// Export the classification report as CSV
    Export {
        /// Output file
        #[arg(short, long, default_value = "rfi_rfq_rfp_report.csv")]
        output: String,

        /// SQLite database file
        #[arg(long, default_value = "./opportunities.db")]
        db: String,
    },

    /// List or discover NAICS codes
    Naics {
        /// Discover codes from live search data instead of the local catalog
        #[arg(short, long)]
        discover: bool,
    },

    /// Download documents for specific solicitations
    Download {
        /// Solicitation numbers to retrieve documents for
        #[arg(required = true)]
        solicitations: Vec<String>,

        /// Content directory for downloaded documents
        #[arg(short, long, default_value = "./downloaded_docs")]
        output: String,
    },
}
