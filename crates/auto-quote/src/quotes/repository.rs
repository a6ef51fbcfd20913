use std::sync::{Mutex, MutexGuard};

use super::domain::{QuoteId, QuoteRecord};

/// Storage abstraction so the service can run against memory, a file, or a test double.
pub trait QuoteRepository: Send + Sync {
    fn insert(&self, record: QuoteRecord) -> Result<QuoteRecord, RepositoryError>;
    fn fetch(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError>;
    /// Every saved quote in insertion order.
    fn list(&self) -> Result<Vec<QuoteRecord>, RepositoryError>;
    /// Remove a quote; `Ok(false)` when nothing matched.
    fn delete(&self, id: &QuoteId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("quote already exists")]
    Conflict,
    #[error("quote store unavailable: {0}")]
    Unavailable(String),
    #[error("quote store is corrupt: {0}")]
    Corrupt(String),
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryQuoteRepository {
    records: Mutex<Vec<QuoteRecord>>,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<QuoteRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("quote store lock poisoned".to_string()))
    }
}

impl QuoteRepository for InMemoryQuoteRepository {
    fn insert(&self, record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        let mut records = self.records()?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        records.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        let records = self.records()?;
        Ok(records.iter().find(|record| &record.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        Ok(self.records()?.clone())
    }

    fn delete(&self, id: &QuoteId) -> Result<bool, RepositoryError> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|record| &record.id != id);
        Ok(records.len() != before)
    }
}
