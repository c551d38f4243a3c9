//! Opportunity analysis endpoint
//!
//! Classifies a single opportunity (RFI/RFQ/RFP), derives the time left
//! until its response deadline, and surfaces set-aside and special
//! requirements worth flagging before a bid decision.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use opptrack_common::doctype::classify;
use opptrack_common::Opportunity;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub document_type: String,
    pub keyword_match: String,
    pub solicitation_number: String,
    pub posted_date: String,
    pub deadline: String,
    pub days_until_deadline: String,
    pub organization_type: String,
    pub naics_code: String,
    pub set_aside_type: String,
    pub set_aside_description: String,
    pub special_considerations: Vec<String>,
}

/// `POST /api/analyze`
///
/// Accepts either a bare opportunity object or `{"opportunity": {...}}`.
pub async fn analyze(
    State(_state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let value = match body.get("opportunity") {
        Some(inner) => inner.clone(),
        None => body,
    };

    if !value.is_object() {
        return Err(ApiError::BadRequest("No opportunity provided".to_string()));
    }

    let opportunity: Opportunity = serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid opportunity: {}", e)))?;

    let analysis = analyze_opportunity(&opportunity);

    Ok(Json(json!({
        "success": true,
        "analysis": analysis,
    })))
}

/// Analyze one opportunity for document type and bidding constraints.
pub fn analyze_opportunity(opportunity: &Opportunity) -> Analysis {
    let title = opportunity.text_field("title");
    let description = opportunity.text_field("description");
    let combined = format!("{} {}", title, description).to_lowercase();

    let classification = classify(&combined);

    let deadline = field_or_na(opportunity, "responseDeadLine");
    let days_until_deadline = days_until(&deadline);

    let set_aside = opportunity
        .str_field("typeOfSetAside")
        .filter(|s| !s.is_empty())
        .unwrap_or("Open to All")
        .to_string();

    Analysis {
        document_type: classification.doc_type.long_label().to_string(),
        keyword_match: classification.keyword,
        solicitation_number: field_or_na(opportunity, "solicitationNumber"),
        posted_date: field_or_na(opportunity, "postedDate"),
        deadline,
        days_until_deadline,
        organization_type: field_or_na(opportunity, "organizationType"),
        naics_code: field_or_na(opportunity, "naicsCode"),
        set_aside_type: set_aside,
        set_aside_description: opportunity.text_field("typeOfSetAsideDescription"),
        special_considerations: special_considerations(&combined),
    }
}

fn field_or_na(opportunity: &Opportunity, name: &str) -> String {
    let text = opportunity.text_field(name);
    if text.is_empty() {
        "N/A".to_string()
    } else {
        text
    }
}

/// Days until an MM/DD/YYYY deadline; "EXPIRED" once past, "N/A" when the
/// date is absent or unparseable.
fn days_until(deadline: &str) -> String {
    if deadline == "N/A" {
        return "N/A".to_string();
    }

    match NaiveDate::parse_from_str(deadline, "%m/%d/%Y") {
        Ok(date) => {
            let days = (date - Utc::now().date_naive()).num_days();
            if days > 0 {
                format!("{} days", days)
            } else {
                "EXPIRED".to_string()
            }
        },
        Err(_) => "N/A".to_string(),
    }
}

/// Keyword scan for certifications and clearances the bid would require.
fn special_considerations(text: &str) -> Vec<String> {
    let mut concerns = Vec::new();

    if text.contains("women") {
        concerns.push("Women-owned business considerations".to_string());
    }
    if text.contains("small") && text.contains("business") {
        concerns.push("Small business certifications required".to_string());
    }
    if text.contains("minority") || text.contains("mbe") {
        concerns.push("Minority business enterprise certifications".to_string());
    }
    if text.contains("security clearance") {
        concerns.push("Security clearance requirements".to_string());
    }
    if text.contains("secret") {
        concerns.push("Classified work - high security requirements".to_string());
    }

    if concerns.is_empty() {
        concerns.push("Standard competition".to_string());
    }

    concerns
}
