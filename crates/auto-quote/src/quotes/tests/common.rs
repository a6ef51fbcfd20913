use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::catalog::VehicleCatalog;
use crate::quotes::domain::{
    ApplicantProfile, CoverageChoice, QuoteData, QuoteId, QuoteRecord, VehicleSelection,
};
use crate::quotes::repository::{InMemoryQuoteRepository, QuoteRepository, RepositoryError};
use crate::quotes::{quote_router, FixedClock, PricingEngine, PricingInput, QuoteService};

pub(super) const CURRENT_YEAR: i32 = 2025;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(CURRENT_YEAR, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn quote_data() -> QuoteData {
    QuoteData {
        applicant: ApplicantProfile {
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana.reyes@example.com".to_string(),
            phone: "5155550134".to_string(),
            age: 34,
            zip: "50309".to_string(),
        },
        vehicle: VehicleSelection {
            vehicle_type: "suv".to_string(),
            vehicle_make: "honda".to_string(),
            vehicle_model: "cr-v".to_string(),
            vehicle_year: 2019,
        },
        coverage: CoverageChoice {
            coverage_level: "standard".to_string(),
            driving_history: "clean".to_string(),
            accidents: 0,
            violations: 0,
        },
    }
}

/// 34-year-old, six-year-old SUV, standard coverage, clean record.
pub(super) const QUOTE_DATA_PREMIUM: f64 = 117.3;

pub(super) fn pricing_input() -> PricingInput {
    PricingInput {
        age: 40,
        vehicle_type: "sedan".to_string(),
        vehicle_year: CURRENT_YEAR - 5,
        accidents: 0,
        violations: 0,
        coverage_level: "basic".to_string(),
        driving_history: "clean".to_string(),
    }
}

pub(super) fn build_service() -> (
    QuoteService<InMemoryQuoteRepository>,
    Arc<InMemoryQuoteRepository>,
) {
    let repository = Arc::new(InMemoryQuoteRepository::new());
    let service = service_with(repository.clone());
    (service, repository)
}

pub(super) fn service_with<R>(repository: Arc<R>) -> QuoteService<R>
where
    R: QuoteRepository + 'static,
{
    QuoteService::new(
        repository,
        Arc::new(VehicleCatalog::standard()),
        PricingEngine::default(),
    )
    .with_clock(FixedClock(now()))
}

pub(super) fn router_with<R>(repository: Arc<R>) -> Router
where
    R: QuoteRepository + 'static,
{
    quote_router(Arc::new(service_with(repository)))
}

pub(super) fn stored_record(id: &str) -> QuoteRecord {
    QuoteRecord {
        id: QuoteId(id.to_string()),
        data: quote_data(),
        quote: QUOTE_DATA_PREMIUM,
        date: now(),
    }
}

pub(super) struct UnavailableRepository;

impl QuoteRepository for UnavailableRepository {
    fn insert(&self, _record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn delete(&self, _id: &QuoteId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl QuoteRepository for ConflictRepository {
    fn insert(&self, _record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: &QuoteId) -> Result<bool, RepositoryError> {
        Ok(false)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected}, got {actual}"
    );
}
