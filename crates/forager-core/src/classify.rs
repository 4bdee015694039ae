//! Pay/contract classification via pattern extraction.
//!
//! The three pattern matchers are named statics so each can be tested and
//! replaced in isolation. All extraction is best-effort: a non-matching
//! pattern and a missing fallback field both yield `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::posting::{ClassifiedPosting, ContractType, PaymentTerms, ProjectType, RawPosting};

/// Source URLs containing one of these domains carry hourly postings;
/// everything else is treated as salaried (OTE).
const HOURLY_MARKETPLACE_DOMAINS: &[&str] = &["upwork.com", "freelancer.com"];

/// `$22.50/hr`, `25 / hr` — captures the full numeric rate.
static HOURLY_RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+(?:\.\d+)?)\s*/\s*hr").unwrap());

/// `$60k - $80k`, `50000-70000` — captures both bounds.
static SALARY_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$?(\d+)k?\s*-\s*\$?(\d+)k?").unwrap());

/// `11-50 employees` — the upper bound is taken as the company size.
static COMPANY_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*-\s*(\d+)\s*employees").unwrap());

/// Contract type is a source-level policy, not a per-item inference.
pub fn contract_type_for_source(source_url: &str) -> ContractType {
    if HOURLY_MARKETPLACE_DOMAINS
        .iter()
        .any(|domain| source_url.contains(domain))
    {
        ContractType::Hourly
    } else {
        ContractType::Ote
    }
}

/// Extract an hourly rate from free text.
pub fn extract_hourly_rate(text: &str) -> Option<f64> {
    HOURLY_RATE_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Extract a salary range from free text.
///
/// A bound written with two digits or fewer is shorthand for thousands
/// (`60` in `$60k - $80k` means 60000), so those are multiplied by 1000.
pub fn extract_salary_range(text: &str) -> Option<(i64, i64)> {
    let caps = SALARY_RANGE_RE.captures(text)?;
    let min = parse_salary_bound(&caps[1])?;
    let max = parse_salary_bound(&caps[2])?;
    Some((min, max))
}

fn parse_salary_bound(digits: &str) -> Option<i64> {
    let value: i64 = digits.parse().ok()?;
    if digits.len() <= 2 {
        Some(value * 1000)
    } else {
        Some(value)
    }
}

/// Extract a company size (upper bound of an employee-count range).
pub fn extract_company_size(text: &str) -> Option<i64> {
    COMPANY_SIZE_RE
        .captures(text)
        .and_then(|caps| caps[2].parse().ok())
}

/// Derive contract type, pay figures, and qualitative tags from a
/// normalized posting. Total and pure: classification never fails.
pub fn classify(raw: &RawPosting, source_url: &str) -> ClassifiedPosting {
    let contract_type = contract_type_for_source(source_url);
    let description = raw.description.to_lowercase();

    let mut posting = ClassifiedPosting {
        raw: raw.clone(),
        contract_type,
        hourly_rate: None,
        ote_min: None,
        ote_max: None,
        payment_terms: None,
        is_payment_verified: false,
        rating: None,
        project_type: None,
        company_size: None,
    };

    match contract_type {
        ContractType::Hourly => {
            posting.hourly_rate = extract_hourly_rate(&description).or(raw.hourly_rate);
            posting.payment_terms = Some(classify_payment_terms(&description));
            posting.is_payment_verified = raw.payment_verified;
            posting.rating = raw.rating;
            posting.project_type = classify_project_type(&description);
        }
        ContractType::Ote => {
            // Fallback bounds come from the salary object independently:
            // a posting with only one known bound keeps it.
            if let Some((min, max)) = extract_salary_range(&description) {
                posting.ote_min = Some(min);
                posting.ote_max = Some(max);
            } else {
                posting.ote_min = raw.salary_min.map(|v| v as i64);
                posting.ote_max = raw.salary_max.map(|v| v as i64);
            }
            posting.company_size = extract_company_size(&description).or(raw.company_size);
        }
    }

    posting
}

fn classify_payment_terms(description: &str) -> PaymentTerms {
    if description.contains("appointment") {
        PaymentTerms::HourlyPlusAppointment
    } else if description.contains("commission") {
        PaymentTerms::HourlyPlusCommission
    } else {
        PaymentTerms::FixedHourly
    }
}

fn classify_project_type(description: &str) -> Option<ProjectType> {
    if description.contains("full time") || description.contains("full-time") {
        Some(ProjectType::FullTime)
    } else if description.contains("part time") || description.contains("part-time") {
        Some(ProjectType::PartTime)
    } else if description.contains("contract to hire") {
        Some(ProjectType::ContractToHire)
    } else {
        None
    }
}
