use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::domain::{EngagementKind, ListingId, ListingRecord};

/// Storage abstraction so the search service can be exercised in isolation.
pub trait ListingRepository: Send + Sync {
    /// Every listing in catalog order.
    fn all(&self) -> Result<Vec<ListingRecord>, RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<ListingRecord>, RepositoryError>;
    fn insert(&self, record: ListingRecord) -> Result<ListingRecord, RepositoryError>;
    fn record_engagement(
        &self,
        id: &ListingId,
        kind: EngagementKind,
        at: DateTime<Utc>,
    ) -> Result<ListingRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing already exists")]
    Conflict,
    #[error("listing not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// In-memory catalog shared between request handlers.
///
/// Readers take a snapshot under the read lock, so a search never observes a
/// half-applied insert or engagement update.
#[derive(Debug, Clone, Default)]
pub struct ListingCatalog {
    listings: Arc<RwLock<Vec<ListingRecord>>>,
}

impl ListingCatalog {
    pub fn from_listings(listings: Vec<ListingRecord>) -> Self {
        Self {
            listings: Arc::new(RwLock::new(listings)),
        }
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let guard = self.listings.read().map_err(poisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("listing catalog lock poisoned".to_string())
}

impl ListingRepository for ListingCatalog {
    fn all(&self) -> Result<Vec<ListingRecord>, RepositoryError> {
        let guard = self.listings.read().map_err(poisoned)?;
        Ok(guard.clone())
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<ListingRecord>, RepositoryError> {
        let guard = self.listings.read().map_err(poisoned)?;
        Ok(guard.iter().find(|listing| &listing.id == id).cloned())
    }

    fn insert(&self, record: ListingRecord) -> Result<ListingRecord, RepositoryError> {
        let mut guard = self.listings.write().map_err(poisoned)?;
        if guard.iter().any(|listing| listing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn record_engagement(
        &self,
        id: &ListingId,
        kind: EngagementKind,
        at: DateTime<Utc>,
    ) -> Result<ListingRecord, RepositoryError> {
        let mut guard = self.listings.write().map_err(poisoned)?;
        let listing = guard
            .iter_mut()
            .find(|listing| &listing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        listing.record_engagement(kind, at);
        Ok(listing.clone())
    }
}
