//! NAICS code catalog
//!
//! A local table of the codes this tool is most often used with, plus live
//! discovery: walking recent search results and collecting the distinct
//! codes they carry. Discovery falls back to the local table when the API
//! yields nothing.

use opptrack_ingest::{SamClient, SearchQuery};
use serde::Serialize;
use tracing::{info, warn};

/// Upper bound on pages walked during discovery.
pub const DISCOVERY_MAX_PAGES: usize = 50;

/// One NAICS code with its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NaicsCode {
    pub code: String,
    pub description: String,
}

/// Common NAICS codes, grouped roughly by sector.
pub const NAICS_CODES: [(&str, &str); 17] = [
    // Computer & IT Services
    ("541511", "Custom Computer Programming Services"),
    ("541512", "Computer Systems Design Services"),
    ("541513", "Computer Facilities Management Services"),
    ("541519", "Other Computer Related Services"),
    ("541690", "Other Professional, Scientific, and Technical Services"),
    // Construction
    ("236220", "Commercial and Institutional Building Construction"),
    ("236210", "Industrial Building and Warehouse Construction"),
    ("237990", "Other Heavy and Civil Engineering Construction"),
    // Engineering Services
    ("541330", "Engineering Services"),
    ("541340", "Drafting Services"),
    ("541360", "Geophysical Surveying and Mapping Services"),
    // Management Services
    ("541611", "Administrative Management and General Management Consulting Services"),
    ("541612", "Human Resources Consulting Services"),
    ("541618", "Other Management Consulting Services"),
    // Professional Services
    ("541810", "Advertising Agencies"),
    ("541820", "Public Relations Agencies"),
    ("541870", "Advertising Material Distribution Services"),
];

/// The local catalog.
pub fn local_codes() -> Vec<NaicsCode> {
    NAICS_CODES
        .iter()
        .map(|(code, description)| NaicsCode {
            code: code.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Discover NAICS codes from live search data.
///
/// Walks up to [`DISCOVERY_MAX_PAGES`] pages of recent opportunities and
/// collects each distinct `naicsCode`, first-seen order. Falls back to the
/// local catalog when the walk yields nothing.
pub async fn discover(client: &SamClient) -> Vec<NaicsCode> {
    let query = SearchQuery {
        limit: 100,
        ..SearchQuery::default()
    };

    let mut pages = client.pages(query);
    let mut codes: Vec<NaicsCode> = Vec::new();

    while let Some(batch) = pages.next_batch().await {
        for record in &batch {
            let Some(code) = record.str_field("naicsCode") else {
                continue;
            };
            if code.is_empty() || codes.iter().any(|c| c.code == code) {
                continue;
            }
            codes.push(NaicsCode {
                code: code.to_string(),
                description: format!("NAICS {}", code),
            });
        }

        info!(
            pages = pages.pages_fetched(),
            codes = codes.len(),
            "NAICS discovery progress"
        );

        if pages.pages_fetched() >= DISCOVERY_MAX_PAGES {
            break;
        }
    }

    if codes.is_empty() {
        warn!("NAICS discovery found nothing, using the local catalog");
        return local_codes();
    }

    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_codes_are_distinct() {
        let codes = local_codes();
        assert_eq!(codes.len(), NAICS_CODES.len());

        let mut seen = std::collections::BTreeSet::new();
        for entry in &codes {
            assert!(seen.insert(entry.code.clone()), "duplicate code {}", entry.code);
        }
    }

    #[test]
    fn test_it_codes_present() {
        let codes = local_codes();
        assert!(codes.iter().any(|c| c.code == "541512"));
    }
}
