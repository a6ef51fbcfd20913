//! Quote intake, premium pricing, and saved-quote storage.
//!
//! A submitted form passes the [`IntakeGuard`], is priced by the [`PricingEngine`], and is
//! saved through a [`QuoteRepository`]. Saved quotes are immutable; they can only be listed,
//! fetched, or deleted.

pub mod domain;
mod file_store;
pub mod intake;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantProfile, CoverageChoice, QuoteData, QuoteId, QuoteRecord, VehicleSelection,
};
pub use file_store::JsonFileQuoteRepository;
pub use intake::{IntakeGuard, IntakeViolation};
pub use pricing::{
    compute_premium, PremiumQuote, PriceAdjustment, PricingEngine, PricingFactor, PricingInput,
    PricingTable, PricingTableError,
};
pub use repository::{InMemoryQuoteRepository, QuoteRepository, RepositoryError};
pub use router::quote_router;
pub use service::{Clock, FixedClock, QuoteService, QuoteServiceError, SystemClock};
