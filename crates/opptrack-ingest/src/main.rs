//! Opptrack Ingest - ingestion tool entry point

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use opptrack_common::logging::{init_logging, LogConfig, LogLevel};
use opptrack_ingest::{client, ClientConfig, IngestOptions, SamClient, SearchQuery};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "opptrack-ingest")]
#[command(author, version, about = "Opportunity ingestion tool")]
struct Cli {
    /// Free-text search keyword
    #[arg(short, long)]
    keyword: Option<String>,

    /// NAICS code filters (repeatable)
    #[arg(short, long)]
    naics: Vec<String>,

    /// Agency filters (repeatable)
    #[arg(short, long)]
    agency: Vec<String>,

    /// Notice type filter
    #[arg(long, default_value = "Solicitation")]
    notice_type: String,

    /// Start of the posted-date range (YYYY-MM-DD); defaults to the
    /// lookback window
    #[arg(long)]
    posted_from: Option<NaiveDate>,

    /// End of the posted-date range (YYYY-MM-DD); defaults to today
    #[arg(long)]
    posted_to: Option<NaiveDate>,

    /// Records per page
    #[arg(long, default_value_t = client::DEFAULT_PAGE_SIZE)]
    limit: usize,

    /// Directory for per-batch CSV files
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// SQLite database file
    #[arg(long, default_value = "./opportunities.db")]
    db: String,

    /// Search API base URL
    #[arg(long, env = "SAM_API_URL", default_value = client::DEFAULT_BASE_URL)]
    api_url: String,

    /// Search API key
    #[arg(long, env = "SAM_API_KEY", default_value = "")]
    api_key: String,

    /// Disable the sample-data fallback on an empty search
    #[arg(long)]
    no_sample_fallback: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("opptrack-ingest".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    let client = SamClient::new(
        ClientConfig::new(cli.api_key.clone()).with_base_url(cli.api_url.clone()),
    )?;

    let options = IngestOptions {
        query: SearchQuery {
            keyword: cli.keyword,
            naics: cli.naics,
            agencies: cli.agency,
            notice_type: cli.notice_type,
            posted_from: cli.posted_from,
            posted_to: cli.posted_to,
            limit: cli.limit,
        },
        data_dir: cli.data_dir.into(),
        db_path: cli.db.into(),
        sample_fallback: !cli.no_sample_fallback,
    };

    let report = opptrack_ingest::run(&client, &options).await?;

    info!(
        batches = report.batches,
        records = report.records,
        rows = report.rows_inserted,
        sample = report.used_sample_data,
        "Ingestion finished"
    );

    Ok(())
}
