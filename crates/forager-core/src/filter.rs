//! Rule-based acceptance filtering.
//!
//! Pure predicates with a permissive tie-break: an unknown (null) numeric
//! attribute never causes rejection, only a known out-of-range value does.

use crate::posting::{ClassifiedPosting, ContractType};

/// Static allow-list of posting locations. Stored on every accepted job so
/// the policy active at scrape time stays auditable.
pub const ALLOWED_LOCATIONS: &[&str] = &[
    "U.S.",
    "USA",
    "United States",
    "Canada",
    "Australia",
    "UK",
    "United Kingdom",
    "South Africa",
    "Remote",
];

/// Minimum acceptable hourly rate (inclusive).
const MIN_HOURLY_RATE: f64 = 18.0;

/// Maximum acceptable company size (exclusive).
const MAX_COMPANY_SIZE: i64 = 100;

/// Target OTE window; a posting is rejected only when its known range
/// falls entirely outside.
const OTE_WINDOW: (i64, i64) = (50_000, 110_000);

/// Minimum acceptable client rating on the verified marketplace.
const MIN_RATING: f64 = 3.0;

/// Case-insensitive substring match against the allow-list.
pub fn is_location_allowed(location: &str) -> bool {
    let lower = location.to_lowercase();
    ALLOWED_LOCATIONS
        .iter()
        .any(|allowed| lower.contains(&allowed.to_lowercase()))
}

/// Accept or reject a classified posting against the configured thresholds.
pub fn accept(posting: &ClassifiedPosting, source_url: &str) -> bool {
    if !is_location_allowed(&posting.raw.location) {
        return false;
    }

    match posting.contract_type {
        ContractType::Hourly => accept_hourly(posting, source_url),
        ContractType::Ote => accept_ote(posting),
    }
}

fn accept_hourly(posting: &ClassifiedPosting, source_url: &str) -> bool {
    if let Some(rate) = posting.hourly_rate
        && rate < MIN_HOURLY_RATE
    {
        return false;
    }

    // Upwork postings additionally require verified payment and a client
    // rating that is either unknown or decent.
    if source_url.contains("upwork.com") {
        if !posting.is_payment_verified {
            return false;
        }
        if let Some(rating) = posting.rating
            && rating < MIN_RATING
        {
            return false;
        }
    }

    true
}

fn accept_ote(posting: &ClassifiedPosting) -> bool {
    if let Some(size) = posting.company_size
        && size >= MAX_COMPANY_SIZE
    {
        return false;
    }

    if let (Some(min), Some(max)) = (posting.ote_min, posting.ote_max)
        && (max < OTE_WINDOW.0 || min > OTE_WINDOW.1)
    {
        return false;
    }

    true
}
