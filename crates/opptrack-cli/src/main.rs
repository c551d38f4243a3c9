//! Opptrack CLI - Main entry point

use clap::Parser;
use opptrack_cli::{Cli, Commands};
use opptrack_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use opptrack_ingest::{ClientConfig, IngestOptions, SamClient, SearchQuery};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Ensure a command is provided
    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // Initialize logging based on verbose flag and environment
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("opptrack-cli".to_string())
            .build()
    } else {
        // Normal mode: only warnings and errors interleave with CLI output
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("opptrack-cli".to_string())
            .build()
    };

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // Initialize logging (ignore errors as the CLI should work without logging)
    let _ = init_logging(&log_config);

    // Execute command
    let result = execute_command(&cli).await;

    // Handle result
    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> opptrack_cli::Result<()> {
    // Command is guaranteed to exist at this point (checked in main)
    let Some(ref command) = cli.command else {
        unreachable!("Command should have been validated in main");
    };

    let client = || -> opptrack_cli::Result<SamClient> {
        Ok(SamClient::new(
            ClientConfig::new(cli.api_key.clone()).with_base_url(cli.api_url.clone()),
        )?)
    };

    match command {
        Commands::Fetch {
            keyword,
            naics,
            agency,
            limit,
            data_dir,
            db,
            no_sample_fallback,
        } => {
            let options = IngestOptions {
                query: SearchQuery {
                    keyword: keyword.clone(),
                    naics: naics.clone(),
                    agencies: agency.clone(),
                    limit: *limit,
                    ..SearchQuery::default()
                },
                data_dir: data_dir.into(),
                db_path: db.into(),
                sample_fallback: !no_sample_fallback,
            };

            opptrack_cli::commands::fetch::run(&client()?, options).await
        }

        Commands::Report { doc_type, stats, db } => {
            opptrack_cli::commands::report::run(db, doc_type.as_deref(), *stats).await
        }

        Commands::Export { output, db } => {
            opptrack_cli::commands::report::export(db, output).await
        }

        Commands::Naics { discover } => {
            opptrack_cli::commands::naics::run(&client()?, *discover).await
        }

        Commands::Download {
            solicitations,
            output,
        } => opptrack_cli::commands::download::run(&client()?, solicitations, output).await,
    }
}
