use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use super::domain::{
    Coordinates, EngagementCounters, EngagementKind, LandType, ListingId, ListingRecord,
    ListingValidationError, PlanningStatus, SizeUnit,
};
use super::query::{run_query, ListingPage, QueryCriteria, QueryError};
use super::repository::{ListingRepository, RepositoryError};
use crate::investment::RiskLevel;

/// Payload for listing a new parcel. Identity, timestamps and counters are assigned
/// by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub postcode: String,
    pub coordinates: Coordinates,
    pub price: u64,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub land_type: LandType,
    pub planning_status: PlanningStatus,
    pub planning_score: u8,
    pub expected_roi_percent: f64,
    #[serde(default)]
    pub near_major_infrastructure: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_risk_level")]
    pub risk_level: RiskLevel,
}

fn default_risk_level() -> RiskLevel {
    RiskLevel::Medium
}

/// Service composing the listing repository with the query pipeline.
pub struct ListingSearchService<R> {
    repository: Arc<R>,
}

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("lst-{id:06}"))
}

impl<R> ListingSearchService<R>
where
    R: ListingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Run the query pipeline over a snapshot of the catalog.
    pub fn search(&self, criteria: &QueryCriteria) -> Result<ListingPage, ListingServiceError> {
        let snapshot = self.repository.all()?;
        let page = run_query(&snapshot, criteria)?;
        debug!(
            catalog = snapshot.len(),
            matched = page.total,
            returned = page.listings.len(),
            page = page.page,
            "listing search"
        );
        Ok(page)
    }

    pub fn get(&self, id: &ListingId) -> Result<ListingRecord, ListingServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Validate and store a new listing with zeroed engagement counters.
    pub fn create(&self, listing: NewListing) -> Result<ListingRecord, ListingServiceError> {
        let now = Utc::now();
        let record = ListingRecord {
            id: next_listing_id(),
            title: listing.title.trim().to_string(),
            description: listing.description,
            location: listing.location.trim().to_string(),
            postcode: listing.postcode.trim().to_string(),
            coordinates: listing.coordinates,
            price: listing.price,
            size: listing.size,
            size_unit: listing.size_unit,
            land_type: listing.land_type,
            planning_status: listing.planning_status,
            planning_score: listing.planning_score,
            expected_roi_percent: listing.expected_roi_percent,
            near_major_infrastructure: listing.near_major_infrastructure,
            featured: listing.featured,
            risk_level: listing.risk_level,
            engagement: EngagementCounters::default(),
            created_at: now,
            updated_at: now,
        };
        record.validate()?;

        let stored = self.repository.insert(record)?;
        info!(listing_id = %stored.id, "listing created");
        Ok(stored)
    }

    pub fn record_engagement(
        &self,
        id: &ListingId,
        kind: EngagementKind,
    ) -> Result<ListingRecord, ListingServiceError> {
        let record = self.repository.record_engagement(id, kind, Utc::now())?;
        debug!(listing_id = %id, ?kind, "engagement recorded");
        Ok(record)
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Validation(#[from] ListingValidationError),
}
