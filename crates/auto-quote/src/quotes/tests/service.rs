use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::common::*;
use crate::catalog::VehicleCatalog;
use crate::quotes::domain::QuoteId;
use crate::quotes::intake::IntakeViolation;
use crate::quotes::pricing::{PricingEngine, PricingInput};
use crate::quotes::repository::{InMemoryQuoteRepository, QuoteRepository, RepositoryError};
use crate::quotes::{FixedClock, QuoteService, QuoteServiceError};

#[test]
fn submit_prices_and_saves_unchanged_data() {
    let (service, repository) = build_service();

    let record = service.submit(quote_data()).expect("submission succeeds");

    assert_close(record.quote, QUOTE_DATA_PREMIUM);
    assert_eq!(record.date, now());
    assert_eq!(record.id, QuoteId(now().timestamp_millis().to_string()));

    let fetched = service.get(&record.id).expect("record stored");
    assert_eq!(fetched.data, quote_data());
    assert_eq!(
        fetched.quote,
        PricingEngine::default().premium(&PricingInput::from(&quote_data()), CURRENT_YEAR)
    );
    assert_eq!(repository.list().expect("list").len(), 1);
}

#[test]
fn ids_stay_unique_within_one_millisecond() {
    let (service, _) = build_service();

    let ids: Vec<QuoteId> = (0..3)
        .map(|_| service.submit(quote_data()).expect("submission succeeds").id)
        .collect();

    let base = now().timestamp_millis();
    assert_eq!(
        ids,
        vec![
            QuoteId(base.to_string()),
            QuoteId((base + 1).to_string()),
            QuoteId((base + 2).to_string()),
        ]
    );
    let listed: Vec<QuoteId> = service
        .list()
        .expect("list")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn submit_propagates_intake_violations_without_saving() {
    let (service, repository) = build_service();
    let mut data = quote_data();
    data.applicant.age = 12;

    match service.submit(data) {
        Err(QuoteServiceError::Intake(IntakeViolation::AgeOutOfRange { found: 12, .. })) => {}
        other => panic!("expected intake violation, got {other:?}"),
    }
    assert!(repository.list().expect("list").is_empty());
}

#[test]
fn estimate_does_not_persist() {
    let (service, repository) = build_service();

    let estimate = service.estimate(&quote_data()).expect("estimate succeeds");

    assert_close(estimate.premium, QUOTE_DATA_PREMIUM);
    assert_eq!(estimate.adjustments.len(), 9);
    assert!(repository.list().expect("list").is_empty());
}

#[test]
fn get_missing_quote_is_not_found() {
    let (service, _) = build_service();

    match service.get(&QuoteId("404".to_string())) {
        Err(QuoteServiceError::NotFound(id)) => assert_eq!(id.0, "404"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn delete_is_idempotent() {
    let (service, _) = build_service();
    let record = service.submit(quote_data()).expect("submission succeeds");

    assert!(service.delete(&record.id).expect("first delete"));
    assert!(matches!(
        service.get(&record.id),
        Err(QuoteServiceError::NotFound(_))
    ));
    assert!(!service.delete(&record.id).expect("second delete"));
}

#[test]
fn repository_failures_surface_as_repository_errors() {
    let service = service_with(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.submit(quote_data()),
        Err(QuoteServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.list(),
        Err(QuoteServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn current_year_vehicles_are_quoted_after_catalog_data_ages() {
    let today = Utc
        .with_ymd_and_hms(2026, 10, 16, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let service = QuoteService::new(
        Arc::new(InMemoryQuoteRepository::new()),
        Arc::new(VehicleCatalog::standard()),
        PricingEngine::default(),
    )
    .with_clock(FixedClock(today));

    let mut data = quote_data();
    data.applicant.age = 20;
    data.vehicle.vehicle_type = "truck".to_string();
    data.vehicle.vehicle_make = "ford".to_string();
    data.vehicle.vehicle_model = "f150".to_string();
    data.vehicle.vehicle_year = 2026;
    data.coverage.coverage_level = "basic".to_string();

    let record = service.submit(data.clone()).expect("2026 F-150 accepted");
    assert_close(record.quote, 140.25);

    data.vehicle.vehicle_year = 2027;
    service.estimate(&data).expect("next model year accepted");
}
