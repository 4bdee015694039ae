use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pay model, determined by source-level policy (hourly marketplaces vs
/// salaried boards), never inferred per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Hourly,
    Ote,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Hourly => "hourly",
            ContractType::Ote => "ote",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(ContractType::Hourly),
            "ote" => Ok(ContractType::Ote),
            _ => Err(format!("Unknown contract type: {}", s)),
        }
    }
}

/// Payment terms derived from the description of an hourly posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTerms {
    FixedHourly,
    HourlyPlusAppointment,
    HourlyPlusCommission,
}

impl PaymentTerms {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTerms::FixedHourly => "fixed_hourly",
            PaymentTerms::HourlyPlusAppointment => "hourly_plus_appointment",
            PaymentTerms::HourlyPlusCommission => "hourly_plus_commission",
        }
    }
}

impl fmt::Display for PaymentTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentTerms {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed_hourly" => Ok(PaymentTerms::FixedHourly),
            "hourly_plus_appointment" => Ok(PaymentTerms::HourlyPlusAppointment),
            "hourly_plus_commission" => Ok(PaymentTerms::HourlyPlusCommission),
            _ => Err(format!("Unknown payment terms: {}", s)),
        }
    }
}

/// Engagement model derived from description keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    FullTime,
    PartTime,
    ContractToHire,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::FullTime => "full_time",
            ProjectType::PartTime => "part_time",
            ProjectType::ContractToHire => "contract_to_hire",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full_time" => Ok(ProjectType::FullTime),
            "part_time" => Ok(ProjectType::PartTime),
            "contract_to_hire" => Ok(ProjectType::ContractToHire),
            _ => Err(format!("Unknown project type: {}", s)),
        }
    }
}

/// An upstream item after alias resolution. Transient, never persisted.
///
/// Every field has a fixed default so the normalizer is total over
/// arbitrary upstream JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_url: String,
    pub tags: Vec<String>,
    /// Explicit upstream rate field, used when no rate is found in the text.
    pub hourly_rate: Option<f64>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub payment_verified: bool,
    pub rating: Option<f64>,
    pub company_size: Option<i64>,
}

/// A RawPosting plus the fields derived by classification. Transient.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPosting {
    pub raw: RawPosting,
    pub contract_type: ContractType,
    pub hourly_rate: Option<f64>,
    pub ote_min: Option<i64>,
    pub ote_max: Option<i64>,
    pub payment_terms: Option<PaymentTerms>,
    pub is_payment_verified: bool,
    pub rating: Option<f64>,
    pub project_type: Option<ProjectType>,
    pub company_size: Option<i64>,
}

/// DTO for inserting an accepted posting into the database.
#[derive(Debug, Clone, Serialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub company_size: Option<i64>,
    pub ote_min: Option<i64>,
    pub ote_max: Option<i64>,
    pub location: String,
    pub tags: Vec<String>,
    pub apply_url: String,
    pub source_id: Uuid,
    pub source_name: String,
    pub scraped_at: DateTime<Utc>,
    pub contract_type: ContractType,
    pub hourly_rate: Option<f64>,
    pub payment_terms: Option<PaymentTerms>,
    pub is_payment_verified: bool,
    pub rating: Option<f64>,
    pub project_type: Option<ProjectType>,
    /// Location allow-list active at scrape time.
    pub allowed_locations: Vec<String>,
}

impl NewJob {
    /// Build the persisted record from an accepted classified posting.
    pub fn from_classified(
        posting: &ClassifiedPosting,
        source_id: Uuid,
        source_name: &str,
        allowed_locations: &[&str],
    ) -> Self {
        Self {
            title: posting.raw.title.clone(),
            company: posting.raw.company.clone(),
            company_size: posting.company_size,
            ote_min: posting.ote_min,
            ote_max: posting.ote_max,
            location: posting.raw.location.clone(),
            tags: posting.raw.tags.clone(),
            apply_url: posting.raw.apply_url.clone(),
            source_id,
            source_name: source_name.to_string(),
            scraped_at: Utc::now(),
            contract_type: posting.contract_type,
            hourly_rate: posting.hourly_rate,
            payment_terms: posting.payment_terms,
            is_payment_verified: posting.is_payment_verified,
            rating: posting.rating,
            project_type: posting.project_type,
            allowed_locations: allowed_locations.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A persisted, accepted posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub company_size: Option<i64>,
    pub ote_min: Option<i64>,
    pub ote_max: Option<i64>,
    pub location: String,
    pub tags: Vec<String>,
    pub apply_url: String,
    pub source_id: Uuid,
    pub source_name: String,
    pub scraped_at: DateTime<Utc>,
    pub contract_type: ContractType,
    pub hourly_rate: Option<f64>,
    pub payment_terms: Option<PaymentTerms>,
    pub is_payment_verified: bool,
    pub rating: Option<f64>,
    pub project_type: Option<ProjectType>,
    pub allowed_locations: Vec<String>,
    pub created_at: DateTime<Utc>,
}
