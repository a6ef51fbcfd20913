mod rules;
mod table;

pub use table::{normalize_label, FactorTable, PricingTable, PricingTableError};

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::domain::QuoteData;

/// The subset of a quote that drives the premium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInput {
    pub age: u32,
    pub vehicle_type: String,
    pub vehicle_year: i32,
    pub accidents: u32,
    pub violations: u32,
    pub coverage_level: String,
    pub driving_history: String,
}

impl From<&QuoteData> for PricingInput {
    fn from(data: &QuoteData) -> Self {
        Self {
            age: data.applicant.age,
            vehicle_type: data.vehicle.vehicle_type.clone(),
            vehicle_year: data.vehicle.vehicle_year,
            accidents: data.coverage.accidents,
            violations: data.coverage.violations,
            coverage_level: data.coverage.coverage_level.clone(),
            driving_history: data.coverage.driving_history.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingFactor {
    Base,
    DriverAge,
    VehicleAge,
    VehicleType,
    DrivingHistory,
    CoverageLevel,
    Accidents,
    Violations,
    SafeDriverDiscount,
}

/// One step of the multiplicative chain, kept for audit and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub factor: PricingFactor,
    pub multiplier: f64,
    pub running_total: f64,
    pub notes: String,
}

/// Final premium plus the chain that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumQuote {
    pub premium: f64,
    pub unrounded: f64,
    pub floor_applied: bool,
    pub adjustments: Vec<PriceAdjustment>,
}

/// Stateless premium calculator over a [`PricingTable`].
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    table: PricingTable,
}

impl PricingEngine {
    pub fn new(table: PricingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PricingTable {
        &self.table
    }

    /// Monthly premium, rounded to cents and clamped to the table's floor. Always finite: an
    /// extreme incident count saturates at `f64::MAX`.
    pub fn premium(&self, input: &PricingInput, current_year: i32) -> f64 {
        self.quote(input, current_year).premium
    }

    pub fn quote(&self, input: &PricingInput, current_year: i32) -> PremiumQuote {
        let adjustments = rules::adjustments(input, &self.table, current_year);
        let unrounded = adjustments
            .last()
            .map(|step| step.running_total)
            .unwrap_or(self.table.base_premium);
        let premium = rules::finalize(unrounded, self.table.minimum_premium);
        let floor_applied = rules::finalize(unrounded, f64::MIN) < self.table.minimum_premium;

        PremiumQuote {
            premium,
            unrounded,
            floor_applied,
            adjustments,
        }
    }
}

/// Premium under the default table for the current calendar year.
pub fn compute_premium(input: &PricingInput) -> f64 {
    PricingEngine::default().premium(input, Local::now().year())
}
