use chrono::{Datelike, Local};
use proptest::prelude::*;

use super::common::*;
use crate::quotes::pricing::{
    compute_premium, PricingEngine, PricingFactor, PricingInput, PricingTable,
};

#[test]
fn young_driver_new_truck_basic_clean() {
    let input = PricingInput {
        age: 20,
        vehicle_type: "truck".to_string(),
        vehicle_year: CURRENT_YEAR,
        accidents: 0,
        violations: 0,
        coverage_level: "basic".to_string(),
        driving_history: "clean".to_string(),
    };

    let premium = PricingEngine::default().premium(&input, CURRENT_YEAR);
    assert_close(premium, 140.25);
}

#[test]
fn incident_surcharges_compound_and_drop_safe_discount() {
    let engine = PricingEngine::default();
    let mut input = PricingInput {
        age: 40,
        vehicle_type: "sedan".to_string(),
        vehicle_year: CURRENT_YEAR - 15,
        accidents: 2,
        violations: 1,
        coverage_level: "full".to_string(),
        driving_history: "major".to_string(),
    };

    let two_accidents = engine.quote(&input, CURRENT_YEAR);
    assert_close(two_accidents.premium, 254.47);
    let discount = two_accidents
        .adjustments
        .iter()
        .find(|step| step.factor == PricingFactor::SafeDriverDiscount)
        .expect("discount step present");
    assert_eq!(discount.multiplier, 1.0);

    input.accidents = 1;
    let one_accident = engine.premium(&input, CURRENT_YEAR);
    assert_close(one_accident, 212.06);
    assert!(two_accidents.premium > one_accident);
}

#[test]
fn adjustments_follow_fixed_order() {
    let quote = PricingEngine::default().quote(&pricing_input(), CURRENT_YEAR);
    let order: Vec<PricingFactor> = quote.adjustments.iter().map(|step| step.factor).collect();

    assert_eq!(
        order,
        vec![
            PricingFactor::Base,
            PricingFactor::DriverAge,
            PricingFactor::VehicleAge,
            PricingFactor::VehicleType,
            PricingFactor::DrivingHistory,
            PricingFactor::CoverageLevel,
            PricingFactor::Accidents,
            PricingFactor::Violations,
            PricingFactor::SafeDriverDiscount,
        ]
    );
    let last = quote.adjustments.last().expect("chain not empty");
    assert_close(last.running_total, quote.unrounded);
    assert_close(quote.premium, 85.0);
    assert!(!quote.floor_applied);
}

#[test]
fn age_thresholds_are_strict() {
    let engine = PricingEngine::default();
    let at = |age: u32| {
        let input = PricingInput {
            age,
            ..pricing_input()
        };
        engine.premium(&input, CURRENT_YEAR)
    };

    assert_close(at(24), 106.25);
    assert_close(at(25), 85.0);
    assert_close(at(65), 85.0);
    assert_close(at(66), 97.75);
}

#[test]
fn vehicle_age_thresholds_are_strict() {
    let engine = PricingEngine::default();
    let built = |years_old: i32| {
        let input = PricingInput {
            vehicle_year: CURRENT_YEAR - years_old,
            ..pricing_input()
        };
        engine.premium(&input, CURRENT_YEAR)
    };

    assert_close(built(2), 93.5);
    assert_close(built(3), 85.0);
    assert_close(built(10), 85.0);
    assert_close(built(11), 72.25);
    // next year's model counts as new
    assert_close(built(-1), 93.5);
}

#[test]
fn unknown_labels_use_fallback_factors() {
    let input = PricingInput {
        vehicle_type: "Hovercraft".to_string(),
        coverage_level: "comprehensive".to_string(),
        driving_history: "spotless".to_string(),
        ..pricing_input()
    };

    let quote = PricingEngine::default().quote(&input, CURRENT_YEAR);
    assert_close(quote.premium, 89.25);
    let vehicle = quote
        .adjustments
        .iter()
        .find(|step| step.factor == PricingFactor::VehicleType)
        .expect("vehicle step present");
    assert!(vehicle.notes.contains("fallback"));
}

#[test]
fn labels_match_case_insensitively() {
    let engine = PricingEngine::default();
    let shouted = PricingInput {
        vehicle_type: " SUV ".to_string(),
        coverage_level: "Premium".to_string(),
        ..pricing_input()
    };
    let quiet = PricingInput {
        vehicle_type: "suv".to_string(),
        coverage_level: "premium".to_string(),
        ..pricing_input()
    };

    assert_eq!(
        engine.premium(&shouted, CURRENT_YEAR),
        engine.premium(&quiet, CURRENT_YEAR)
    );
}

#[test]
fn floor_applies_to_cheap_tables() {
    let engine = PricingEngine::new(PricingTable {
        base_premium: 20.0,
        ..PricingTable::default()
    });

    let quote = engine.quote(&pricing_input(), CURRENT_YEAR);
    assert_close(quote.unrounded, 17.0);
    assert_eq!(quote.premium, 30.0);
    assert!(quote.floor_applied);
}

#[test]
fn compute_premium_uses_default_table_and_this_year() {
    let input = pricing_input();
    let expected = PricingEngine::default().premium(&input, Local::now().year());
    assert_eq!(compute_premium(&input), expected);
}

fn input_strategy() -> impl Strategy<Value = PricingInput> {
    (
        0u32..=120,
        prop::sample::select(vec!["sedan", "suv", "truck", "van", "coupe", ""]),
        1950i32..=2030,
        0u32..=12,
        0u32..=12,
        prop::sample::select(vec!["basic", "standard", "full", "premium", "other"]),
        prop::sample::select(vec!["clean", "minor", "major", "unknown"]),
    )
        .prop_map(
            |(age, vehicle_type, vehicle_year, accidents, violations, coverage, history)| {
                PricingInput {
                    age,
                    vehicle_type: vehicle_type.to_string(),
                    vehicle_year,
                    accidents,
                    violations,
                    coverage_level: coverage.to_string(),
                    driving_history: history.to_string(),
                }
            },
        )
}

proptest! {
    #[test]
    fn premium_is_deterministic(input in input_strategy()) {
        let engine = PricingEngine::default();
        prop_assert_eq!(
            engine.premium(&input, CURRENT_YEAR),
            engine.premium(&input.clone(), CURRENT_YEAR)
        );
    }

    #[test]
    fn premium_never_below_floor(input in input_strategy(), base in 0.01f64..500.0) {
        let table = PricingTable { base_premium: base, ..PricingTable::default() };
        let floor = table.minimum_premium;
        let premium = PricingEngine::new(table).premium(&input, CURRENT_YEAR);
        prop_assert!(premium >= floor);
    }

    #[test]
    fn more_incidents_never_lower_premium(input in input_strategy()) {
        let engine = PricingEngine::default();
        let premium = engine.premium(&input, CURRENT_YEAR);

        let more_accidents = PricingInput { accidents: input.accidents + 1, ..input.clone() };
        let more_violations = PricingInput { violations: input.violations + 1, ..input.clone() };

        prop_assert!(engine.premium(&more_accidents, CURRENT_YEAR) >= premium);
        prop_assert!(engine.premium(&more_violations, CURRENT_YEAR) >= premium);
    }

    #[test]
    fn first_incident_never_lowers_premium_under_valid_tables(
        input in input_strategy(),
        safe_driver_factor in 0.5f64..=1.0,
        accident_weight in 0.0f64..1.0,
    ) {
        let overrides = serde_json::json!({
            "safe_driver_factor": safe_driver_factor,
            "accident_weight": accident_weight,
        });
        let table = PricingTable::from_json(&overrides.to_string());
        prop_assert!(table.is_ok());
        let engine = PricingEngine::new(table.unwrap_or_default());

        let clean = PricingInput { accidents: 0, violations: 0, ..input };
        let one_accident = PricingInput { accidents: 1, ..clean.clone() };
        prop_assert!(
            engine.premium(&one_accident, CURRENT_YEAR) >= engine.premium(&clean, CURRENT_YEAR)
        );
    }

    #[test]
    fn premium_stays_finite_for_any_incident_count(
        input in input_strategy(),
        accidents in 0u32..=u32::MAX,
        violations in prop_oneof![Just(u32::MAX), 0u32..=u32::MAX],
    ) {
        let engine = PricingEngine::default();
        let input = PricingInput { accidents, violations, ..input };
        let quote = engine.quote(&input, CURRENT_YEAR);

        prop_assert!(quote.premium.is_finite());
        prop_assert!(quote.adjustments.iter().all(|step| step.running_total.is_finite()));
        prop_assert!(serde_json::to_value(&quote)
            .map(|value| value["premium"].is_f64())
            .unwrap_or(false));
    }
}
