use super::table::PricingTable;
use super::{PriceAdjustment, PricingFactor, PricingInput};

struct Chain {
    running_total: f64,
    adjustments: Vec<PriceAdjustment>,
}

impl Chain {
    fn start(base: f64) -> Self {
        Self {
            running_total: base,
            adjustments: vec![PriceAdjustment {
                factor: PricingFactor::Base,
                multiplier: 1.0,
                running_total: base,
                notes: format!("base premium {base:.2}"),
            }],
        }
    }

    /// The running total saturates at `f64::MAX` instead of overflowing to infinity.
    fn apply(&mut self, factor: PricingFactor, multiplier: f64, notes: String) {
        self.running_total = (self.running_total * multiplier).min(f64::MAX);
        self.adjustments.push(PriceAdjustment {
            factor,
            multiplier,
            running_total: self.running_total,
            notes,
        });
    }
}

/// Run the ordered multiplicative chain: driver and vehicle age first, then the categorical
/// factors, then per-incident surcharges, and the safe-driver discount last.
pub(crate) fn adjustments(
    input: &PricingInput,
    table: &PricingTable,
    current_year: i32,
) -> Vec<PriceAdjustment> {
    let mut chain = Chain::start(table.base_premium);

    let (multiplier, notes) = if input.age < table.young_driver_age {
        (
            table.young_driver_factor,
            format!("driver age {} under {}", input.age, table.young_driver_age),
        )
    } else if input.age > table.senior_driver_age {
        (
            table.senior_driver_factor,
            format!("driver age {} over {}", input.age, table.senior_driver_age),
        )
    } else {
        (1.0, format!("driver age {} in standard bracket", input.age))
    };
    chain.apply(PricingFactor::DriverAge, multiplier, notes);

    let vehicle_age = current_year.saturating_sub(input.vehicle_year);
    let (multiplier, notes) = if vehicle_age > table.older_vehicle_years {
        (
            table.older_vehicle_factor,
            format!("vehicle {vehicle_age} years old, over {}", table.older_vehicle_years),
        )
    } else if vehicle_age < table.newer_vehicle_years {
        (
            table.newer_vehicle_factor,
            format!("vehicle {vehicle_age} years old, under {}", table.newer_vehicle_years),
        )
    } else {
        (1.0, format!("vehicle {vehicle_age} years old"))
    };
    chain.apply(PricingFactor::VehicleAge, multiplier, notes);

    chain.apply(
        PricingFactor::VehicleType,
        table.vehicle_types.factor(&input.vehicle_type),
        category_notes(
            "vehicle type",
            &input.vehicle_type,
            table.vehicle_types.is_known(&input.vehicle_type),
        ),
    );
    chain.apply(
        PricingFactor::DrivingHistory,
        table.driving_history.factor(&input.driving_history),
        category_notes(
            "driving history",
            &input.driving_history,
            table.driving_history.is_known(&input.driving_history),
        ),
    );
    chain.apply(
        PricingFactor::CoverageLevel,
        table.coverage_levels.factor(&input.coverage_level),
        category_notes(
            "coverage level",
            &input.coverage_level,
            table.coverage_levels.is_known(&input.coverage_level),
        ),
    );

    chain.apply(
        PricingFactor::Accidents,
        per_incident(table.accident_weight, input.accidents),
        format!(
            "{} accident(s) at {:.0}% each",
            input.accidents,
            table.accident_weight * 100.0
        ),
    );
    chain.apply(
        PricingFactor::Violations,
        per_incident(table.violation_weight, input.violations),
        format!(
            "{} violation(s) at {:.0}% each",
            input.violations,
            table.violation_weight * 100.0
        ),
    );

    if input.accidents == 0 && input.violations == 0 {
        chain.apply(
            PricingFactor::SafeDriverDiscount,
            table.safe_driver_factor,
            "no accidents or violations".to_string(),
        );
    } else {
        chain.apply(
            PricingFactor::SafeDriverDiscount,
            1.0,
            "not eligible: incidents on record".to_string(),
        );
    }

    chain.adjustments
}

fn per_incident(weight: f64, count: u32) -> f64 {
    let exponent = i32::try_from(count).unwrap_or(i32::MAX);
    (1.0 + weight).powi(exponent).min(f64::MAX)
}

fn category_notes(kind: &str, label: &str, known: bool) -> String {
    if known {
        format!("{kind} '{}'", label.trim())
    } else {
        format!("{kind} '{}' not in table, fallback applied", label.trim())
    }
}

/// Round to cents, then never go below the floor. Totals too large to scale by 100 have no
/// fractional cents and pass through unchanged.
pub(crate) fn finalize(raw: f64, floor: f64) -> f64 {
    let cents = raw * 100.0;
    let rounded = if cents.is_finite() {
        cents.round() / 100.0
    } else {
        raw
    };
    rounded.max(floor)
}
