//! `opptrack fetch` command implementation
//!
//! Runs a full ingestion: paginated search, per-batch CSV files, and the
//! fixed-schema SQLite table.

use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use opptrack_ingest::{IngestOptions, SamClient};
use std::time::Duration;

pub async fn run(client: &SamClient, options: IngestOptions) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Fetching opportunities...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let report = opptrack_ingest::run(client, &options).await?;

    spinner.finish_and_clear();

    if report.used_sample_data {
        println!(
            "{}",
            "No results from the API search; persisted sample data instead.".yellow()
        );
    }

    println!("{}", "Ingestion complete.".green().bold());
    println!("  Batches:       {}", report.batches);
    println!("  Records:       {}", report.records);
    println!("  Rows inserted: {}", report.rows_inserted);
    println!("  CSV files:     {}", options.data_dir.display());
    println!("  Database:      {}", options.db_path.display());

    Ok(())
}
