//! Field normalization from arbitrary upstream JSON shapes.
//!
//! Each canonical field maps to a fixed priority list of alias keys; the
//! first present, non-empty alias wins. Adding a new provider means adding
//! an alias, never branching on provider identity downstream.

use serde_json::Value;

use crate::posting::RawPosting;

const TITLE_ALIASES: &[&str] = &["title", "jobTitle", "position", "positionTitle"];
const COMPANY_ALIASES: &[&str] = &["company", "companyName", "employer"];
const LOCATION_ALIASES: &[&str] = &["location", "jobLocation"];
const APPLY_URL_ALIASES: &[&str] = &["url", "link", "applyUrl", "jobUrl"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "jobDescription", "details"];
const TAGS_ALIASES: &[&str] = &["tags", "skills", "categories"];
const PAYMENT_VERIFIED_ALIASES: &[&str] = &["paymentVerified", "payment_verified"];
const RATING_ALIASES: &[&str] = &["rating", "clientRating"];
const SALARY_OBJECT_ALIASES: &[&str] = &["salary", "salaryRange"];
const SALARY_MIN_ALIASES: &[&str] = &["min", "minSalary"];
const SALARY_MAX_ALIASES: &[&str] = &["max", "maxSalary"];

/// Map an upstream item into a canonical [`RawPosting`].
///
/// Total function: any JSON value, including non-objects, yields a posting
/// with defaults filled in. `location` defaults to `"Remote"`, `apply_url`
/// to the source's own URL.
pub fn normalize(item: &Value, source_url: &str) -> RawPosting {
    RawPosting {
        title: resolve_string(item, TITLE_ALIASES).unwrap_or_default(),
        company: resolve_string(item, COMPANY_ALIASES).unwrap_or_else(|| "Unknown".to_string()),
        location: resolve_string(item, LOCATION_ALIASES).unwrap_or_else(|| "Remote".to_string()),
        description: resolve_string(item, DESCRIPTION_ALIASES).unwrap_or_default(),
        apply_url: resolve_string(item, APPLY_URL_ALIASES)
            .unwrap_or_else(|| source_url.to_string()),
        tags: resolve_tags(item),
        hourly_rate: resolve_number(item, &["hourlyRate"]),
        salary_min: resolve_salary_bound(item, SALARY_MIN_ALIASES),
        salary_max: resolve_salary_bound(item, SALARY_MAX_ALIASES),
        payment_verified: resolve_bool(item, PAYMENT_VERIFIED_ALIASES),
        rating: resolve_number(item, RATING_ALIASES),
        company_size: resolve_integer(item, &["companySize"]),
    }
}

/// First present, non-empty string among the aliases.
fn resolve_string(item: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| item.get(key))
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// First alias holding a JSON number or a numeric string.
fn resolve_number(item: &Value, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|key| item.get(key))
        .find_map(as_f64)
}

fn resolve_integer(item: &Value, aliases: &[&str]) -> Option<i64> {
    aliases
        .iter()
        .filter_map(|key| item.get(key))
        .find_map(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
}

fn resolve_bool(item: &Value, aliases: &[&str]) -> bool {
    aliases
        .iter()
        .filter_map(|key| item.get(key))
        .find_map(|v| v.as_bool())
        .unwrap_or(false)
}

/// Tags from the first alias holding an array; non-array values and
/// non-string elements are dropped.
fn resolve_tags(item: &Value) -> Vec<String> {
    TAGS_ALIASES
        .iter()
        .filter_map(|key| item.get(key))
        .find_map(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Salary bound from a nested salary object: `(salary | salaryRange).(min |
/// minSalary)` and likewise for max.
fn resolve_salary_bound(item: &Value, bound_aliases: &[&str]) -> Option<f64> {
    SALARY_OBJECT_ALIASES
        .iter()
        .filter_map(|key| item.get(key))
        .find(|v| v.is_object())
        .and_then(|obj| resolve_number(obj, bound_aliases))
}

/// Accepts JSON numbers and numeric strings.
fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}
