//! Bundled sample opportunities
//!
//! Used as a fallback when a live search yields zero records (expired API
//! key, empty date window, network outage), so the dashboard and reports
//! still have data to demonstrate against.

use opptrack_common::Opportunity;
use serde_json::json;

/// Five representative IT opportunities, shaped like live search records.
pub fn sample_opportunities() -> Vec<Opportunity> {
    let records = json!([
        {
            "title": "Cloud Computing Infrastructure Services RFP",
            "solicitationNumber": "DOD-CLOUD-25-001",
            "agency": "DEPARTMENT OF DEFENSE",
            "noticeType": "Solicitation",
            "description": "Request for Proposal to provide cloud computing infrastructure services for DoD operations.",
            "postedDate": "2025-12-20",
            "responseDeadLine": "01/15/2026",
            "naicsCode": "541512",
            "attachments": ["Spec_Sheet.pdf", "RFP_Guidelines.pdf"],
            "opportunityStatus": "Posted",
            "naicsDescription": "Computer Systems Design Services"
        },
        {
            "title": "IT Software Development Services RFQ",
            "solicitationNumber": "HHS-IT-25-002",
            "agency": "DEPARTMENT OF HEALTH AND HUMAN SERVICES",
            "noticeType": "Solicitation",
            "description": "Request for Quote for custom IT software development for federal health systems.",
            "postedDate": "2025-12-22",
            "responseDeadLine": "01/10/2026",
            "naicsCode": "541511",
            "attachments": ["Tech_Requirements.pdf"],
            "opportunityStatus": "Posted",
            "naicsDescription": "Custom Computer Programming Services"
        },
        {
            "title": "Cybersecurity Solutions Implementation RFI",
            "solicitationNumber": "GSA-SEC-25-003",
            "agency": "GENERAL SERVICES ADMINISTRATION",
            "noticeType": "Solicitation",
            "description": "Request for Information on cybersecurity solution providers for federal agencies.",
            "postedDate": "2025-12-18",
            "responseDeadLine": "01/05/2026",
            "naicsCode": "541513",
            "attachments": [],
            "opportunityStatus": "Posted",
            "naicsDescription": "Computer Facilities Management Services"
        },
        {
            "title": "Enterprise Data Analytics Platform RFP",
            "solicitationNumber": "NOAA-DATA-25-004",
            "agency": "NATIONAL OCEANIC AND ATMOSPHERIC ADMINISTRATION",
            "noticeType": "Solicitation",
            "description": "Major RFP for enterprise-wide data analytics and reporting platform.",
            "postedDate": "2025-12-21",
            "responseDeadLine": "01/20/2026",
            "naicsCode": "541512",
            "attachments": ["Data_Schema.pdf", "Integration_Requirements.pdf"],
            "opportunityStatus": "Posted",
            "naicsDescription": "Computer Systems Design Services"
        },
        {
            "title": "Network Infrastructure IT Services Contract",
            "solicitationNumber": "VA-NET-25-005",
            "agency": "DEPARTMENT OF VETERANS AFFAIRS",
            "noticeType": "Solicitation",
            "description": "Ongoing IT services for network infrastructure maintenance and upgrades.",
            "postedDate": "2025-12-19",
            "responseDeadLine": "01/15/2026",
            "naicsCode": "541519",
            "attachments": ["Network_Specs.pdf"],
            "opportunityStatus": "Posted",
            "naicsDescription": "Other Computer Related Services"
        }
    ]);

    serde_json::from_value(records).unwrap_or_default()
}
