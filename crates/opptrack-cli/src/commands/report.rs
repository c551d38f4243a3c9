//! `opptrack report` and `opptrack export` command implementations
//!
//! Renders the RFI/RFQ/RFP breakdown of the stored opportunities as
//! summary tables, per-type listings, percentage statistics, or a CSV
//! report file.

use crate::error::Result;
use crate::report::{parse_doc_type, DocTypeReport, ReportRow};
use colored::Colorize;
use comfy_table::Table;
use opptrack_common::doctype::DocType;
use std::path::Path;

const REPORT_TYPES: [DocType; 4] =
    [DocType::Rfi, DocType::Rfq, DocType::Rfp, DocType::Solicitation];

/// Show the classification report.
pub async fn run(db: &str, doc_type: Option<&str>, stats: bool) -> Result<()> {
    let report = DocTypeReport::load(Path::new(db)).await?;

    if report.is_empty() {
        println!("No opportunities found in the database.");
        println!("Run 'opptrack fetch' first to fetch data.");
        return Ok(());
    }

    if stats {
        print_stats(&report);
        return Ok(());
    }

    match doc_type {
        Some(name) => print_detail(&report, parse_doc_type(name)?),
        None => print_summary(&report),
    }

    Ok(())
}

/// Export the report to CSV.
pub async fn export(db: &str, output: &str) -> Result<()> {
    let report = DocTypeReport::load(Path::new(db)).await?;
    report.export_csv(Path::new(output))?;

    println!(
        "{} {} rows exported to {}",
        "Report written.".green().bold(),
        report.rows().len(),
        output
    );

    Ok(())
}

fn print_summary(report: &DocTypeReport) {
    println!("{}", "Document type summary".cyan().bold());
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Type", "Count", "Example"]);

    for doc_type in REPORT_TYPES {
        let rows = report.filter(doc_type);
        let example = rows
            .first()
            .map(|r| truncate(&r.opportunity.title, 50))
            .unwrap_or_default();
        table.add_row(vec![
            doc_type.long_label().to_string(),
            rows.len().to_string(),
            example,
        ]);
    }

    println!("{table}");
    println!();
    println!("Total opportunities: {}", report.rows().len());
}

fn print_detail(report: &DocTypeReport, doc_type: DocType) {
    let rows = report.filter(doc_type);

    println!(
        "{} ({} opportunities)",
        doc_type.long_label().cyan().bold(),
        rows.len()
    );
    println!();

    let mut table = Table::new();
    table.set_header(vec![
        "Solicitation", "Title", "Agency", "Posted", "NAICS", "Match",
    ]);

    for row in &rows {
        table.add_row(row_cells(row));
    }

    println!("{table}");
}

fn print_stats(report: &DocTypeReport) {
    let stats = report.stats();

    println!("{}", "Document type statistics".cyan().bold());
    println!();
    println!("Total opportunities: {}", stats.total);
    println!();
    println!("RFI:   {:>5}  ({:.1}%)", stats.rfi, stats.percentage(stats.rfi));
    println!("RFQ:   {:>5}  ({:.1}%)", stats.rfq, stats.percentage(stats.rfq));
    println!("RFP:   {:>5}  ({:.1}%)", stats.rfp, stats.percentage(stats.rfp));
    println!("Other: {:>5}  ({:.1}%)", stats.other, stats.percentage(stats.other));
}

fn row_cells(row: &ReportRow) -> Vec<String> {
    vec![
        row.opportunity.solicitation_number.clone(),
        truncate(&row.opportunity.title, 60),
        truncate(&row.opportunity.agency, 30),
        row.opportunity.posted_date.clone(),
        row.opportunity.naics_code.clone(),
        row.keyword.clone(),
    ]
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 10), "0123456789...");
    }
}
