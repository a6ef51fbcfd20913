//! Auto insurance quoting.
//!
//! The crate is split the way the quote flow runs: a static [`catalog`] narrows the vehicle
//! selection, the [`quotes`] module validates a submission, prices it, and keeps the result in
//! a [`quotes::QuoteRepository`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod quotes;
pub mod telemetry;
