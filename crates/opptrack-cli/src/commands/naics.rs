//! `opptrack naics` command implementation

use crate::error::Result;
use crate::naics;
use colored::Colorize;
use comfy_table::Table;
use opptrack_ingest::SamClient;

pub async fn run(client: &SamClient, discover: bool) -> Result<()> {
    let codes = if discover {
        println!("Discovering NAICS codes from live search data...");
        naics::discover(client).await
    } else {
        naics::local_codes()
    };

    let mut table = Table::new();
    table.set_header(vec!["Code", "Description"]);
    for entry in &codes {
        table.add_row(vec![entry.code.clone(), entry.description.clone()]);
    }

    println!("{table}");
    println!();
    println!("{} {} codes", "Loaded".green().bold(), codes.len());

    Ok(())
}
