use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for saved quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub String);

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity and contact details; only `age` feeds pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSelection {
    pub vehicle_type: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
}

/// Coverage tier plus the driving record that prices it.
///
/// `coverage_level` and `driving_history` stay free-form so stored quotes echo exactly what was
/// submitted; pricing maps unknown labels to fallback factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageChoice {
    pub coverage_level: String,
    pub driving_history: String,
    pub accidents: u32,
    pub violations: u32,
}

/// Everything collected by the multi-step quote form, as one flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteData {
    #[serde(flatten)]
    pub applicant: ApplicantProfile,
    #[serde(flatten)]
    pub vehicle: VehicleSelection,
    #[serde(flatten)]
    pub coverage: CoverageChoice,
}

/// A priced, saved quote. Records are never updated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: QuoteId,
    pub data: QuoteData,
    pub quote: f64,
    pub date: DateTime<Utc>,
}
