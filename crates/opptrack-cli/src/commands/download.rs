//! `opptrack download` command implementation
//!
//! Retrieves descriptions and attachments for specific solicitations and
//! writes the run's download log.

use crate::error::Result;
use colored::Colorize;
use opptrack_ingest::{DocumentDownloader, SamClient};

pub async fn run(client: &SamClient, solicitations: &[String], output: &str) -> Result<()> {
    let mut downloader = DocumentDownloader::new(output, client.clone())?;

    for (idx, solicitation) in solicitations.iter().enumerate() {
        println!(
            "[{}/{}] {}",
            idx + 1,
            solicitations.len(),
            solicitation.cyan()
        );

        let outcome = downloader.run_for(solicitation).await;

        if !outcome.found {
            println!("  {} no detail record found", "!".yellow());
            continue;
        }

        if outcome.description_saved {
            println!("  {} description saved", "ok".green());
        }
        println!(
            "  {} {} attachment(s) downloaded",
            "ok".green(),
            outcome.attachments_downloaded
        );
    }

    let log_path = downloader.save_log()?;
    let log = downloader.log();

    println!();
    println!("{}", "Download summary".cyan().bold());
    println!("  Opportunities processed: {}", log.total_opportunities);
    println!("  Descriptions saved:      {}", log.descriptions_saved);
    println!("  Attachments downloaded:  {}", log.attachments_downloaded);
    println!("  Errors:                  {}", log.errors.len());
    println!("  Log file:                {}", log_path.display());

    if !log.errors.is_empty() {
        println!();
        println!("{}", "Errors encountered:".yellow());
        for error in log.errors.iter().take(5) {
            println!("  - {}: {}", error.identifier, error.error);
        }
        if log.errors.len() > 5 {
            println!("  ... and {} more", log.errors.len() - 5);
        }
    }

    Ok(())
}
