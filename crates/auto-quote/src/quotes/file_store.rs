use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use super::domain::{QuoteId, QuoteRecord};
use super::repository::{QuoteRepository, RepositoryError};

/// Saved quotes kept as one pretty-printed JSON array on disk.
///
/// A missing file reads as an empty list. Writes go to a sibling temporary file that is then
/// renamed over the original, so readers never observe a half-written list.
#[derive(Debug)]
pub struct JsonFileQuoteRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileQuoteRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, RepositoryError> {
        self.lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("quote file lock poisoned".to_string()))
    }

    fn read_all(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(self.unavailable(error)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            warn!(path = %self.path.display(), %error, "quote file failed to parse");
            RepositoryError::Corrupt(format!("{}: {error}", self.path.display()))
        })
    }

    fn write_all(&self, records: &[QuoteRecord]) -> Result<(), RepositoryError> {
        let payload = serde_json::to_vec_pretty(records)
            .map_err(|error| RepositoryError::Unavailable(error.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(&payload)?;
            file.sync_all()
        });
        written
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|error| self.unavailable(error))
    }

    fn unavailable(&self, error: io::Error) -> RepositoryError {
        warn!(path = %self.path.display(), %error, "quote file io failed");
        RepositoryError::Unavailable(format!("{}: {error}", self.path.display()))
    }
}

impl QuoteRepository for JsonFileQuoteRepository {
    fn insert(&self, record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        let _guard = self.guard()?;
        let mut records = self.read_all()?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        records.push(record.clone());
        self.write_all(&records)?;
        Ok(record)
    }

    fn fetch(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.into_iter().find(|record| &record.id == id))
    }

    fn list(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        let _guard = self.guard()?;
        self.read_all()
    }

    fn delete(&self, id: &QuoteId) -> Result<bool, RepositoryError> {
        let _guard = self.guard()?;
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|record| &record.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_all(&records)?;
        Ok(true)
    }
}
