use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, Utc};
use tracing::{info, warn};

use crate::catalog::VehicleCatalog;

use super::domain::{QuoteData, QuoteId, QuoteRecord};
use super::intake::{IntakeGuard, IntakeViolation};
use super::pricing::{PremiumQuote, PricingEngine, PricingInput};
use super::repository::{QuoteRepository, RepositoryError};

/// Source of "now" for quote dates, ids, and vehicle age.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar year used for vehicle age and the model-year ceiling.
    fn current_year(&self) -> i32 {
        self.now().with_timezone(&Local).year()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn current_year(&self) -> i32 {
        self.0.year()
    }
}

/// Service composing the intake guard, pricing engine, and quote repository.
pub struct QuoteService<R> {
    guard: IntakeGuard,
    engine: Arc<PricingEngine>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    last_id: AtomicI64,
}

impl<R> QuoteService<R>
where
    R: QuoteRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<VehicleCatalog>, engine: PricingEngine) -> Self {
        Self {
            guard: IntakeGuard::new(catalog),
            engine: Arc::new(engine),
            repository,
            clock: Arc::new(SystemClock),
            last_id: AtomicI64::new(0),
        }
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn catalog(&self) -> &VehicleCatalog {
        self.guard.catalog()
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Validate, price, and persist a new quote.
    pub fn submit(&self, data: QuoteData) -> Result<QuoteRecord, QuoteServiceError> {
        let now = self.clock.now();
        let current_year = self.clock.current_year();
        self.guard.check(&data, current_year)?;

        let premium = self.engine.premium(&PricingInput::from(&data), current_year);
        let record = QuoteRecord {
            id: self.next_id(now),
            data,
            quote: premium,
            date: now,
        };

        let stored = self.repository.insert(record).map_err(|error| {
            warn!(%error, "failed to save quote");
            error
        })?;
        info!(quote_id = %stored.id, premium = stored.quote, "quote saved");
        Ok(stored)
    }

    /// Validate and price without saving, returning the full adjustment chain.
    pub fn estimate(&self, data: &QuoteData) -> Result<PremiumQuote, QuoteServiceError> {
        let current_year = self.clock.current_year();
        self.guard.check(data, current_year)?;
        Ok(self.engine.quote(&PricingInput::from(data), current_year))
    }

    pub fn get(&self, id: &QuoteId) -> Result<QuoteRecord, QuoteServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| QuoteServiceError::NotFound(id.clone()))
    }

    pub fn list(&self) -> Result<Vec<QuoteRecord>, QuoteServiceError> {
        Ok(self.repository.list()?)
    }

    /// Delete a quote. Deleting an unknown id is not an error; the flag reports whether
    /// anything was removed.
    pub fn delete(&self, id: &QuoteId) -> Result<bool, QuoteServiceError> {
        let removed = self.repository.delete(id)?;
        if removed {
            info!(quote_id = %id, "quote deleted");
        }
        Ok(removed)
    }

    /// Millisecond timestamp id, bumped past the previous id when two quotes share a millisecond.
    fn next_id(&self, now: DateTime<Utc>) -> QuoteId {
        let millis = now.timestamp_millis();
        let previous = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(millis.max(last.saturating_add(1)))
            })
            .unwrap_or(millis);
        QuoteId(millis.max(previous.saturating_add(1)).to_string())
    }
}

/// Error raised by the quote service.
#[derive(Debug, thiserror::Error)]
pub enum QuoteServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("quote {0} not found")]
    NotFound(QuoteId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
