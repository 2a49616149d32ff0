use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::investment::RiskLevel;
use crate::listings::domain::{
    Coordinates, EngagementCounters, EngagementKind, LandType, ListingId, ListingRecord,
    PlanningStatus, SizeUnit,
};
use crate::listings::repository::{ListingCatalog, ListingRepository, RepositoryError};
use crate::listings::service::{ListingSearchService, NewListing};

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// Minimal valid listing; tests override the fields they care about.
pub(super) fn listing(id: &str, price: u64, roi: f64) -> ListingRecord {
    ListingRecord {
        id: ListingId(id.to_string()),
        title: format!("Plot {id}"),
        description: "Level site with road frontage".to_string(),
        location: "Birmingham".to_string(),
        postcode: "B1 1AA".to_string(),
        coordinates: Coordinates {
            latitude: 52.48,
            longitude: -1.89,
        },
        price,
        size: 1.0,
        size_unit: SizeUnit::Acres,
        land_type: LandType::Residential,
        planning_status: PlanningStatus::Pending,
        planning_score: 50,
        expected_roi_percent: roi,
        near_major_infrastructure: false,
        featured: false,
        risk_level: RiskLevel::Medium,
        engagement: EngagementCounters::default(),
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// Three listings used by the pagination and sorting scenarios.
pub(super) fn trio() -> Vec<ListingRecord> {
    vec![
        listing("L1", 450_000, 32.0),
        listing("L2", 90_000, 12.0),
        listing("L3", 600_000, 55.0),
    ]
}

pub(super) fn catalog_with(listings: Vec<ListingRecord>) -> Arc<ListingCatalog> {
    Arc::new(ListingCatalog::from_listings(listings))
}

pub(super) fn build_service() -> (ListingSearchService<ListingCatalog>, Arc<ListingCatalog>) {
    let catalog = catalog_with(trio());
    (ListingSearchService::new(catalog.clone()), catalog)
}

pub(super) fn new_listing() -> NewListing {
    NewListing {
        title: "Canal-side Plot".to_string(),
        description: "Former boatyard".to_string(),
        location: "Digbeth".to_string(),
        postcode: "B5 6DY".to_string(),
        coordinates: Coordinates {
            latitude: 52.4751,
            longitude: -1.8834,
        },
        price: 380_000,
        size: 0.6,
        size_unit: SizeUnit::Acres,
        land_type: LandType::MixedUse,
        planning_status: PlanningStatus::PreApplication,
        planning_score: 70,
        expected_roi_percent: 27.5,
        near_major_infrastructure: true,
        featured: false,
        risk_level: RiskLevel::Low,
    }
}

pub(super) fn later(hours: i64) -> DateTime<Utc> {
    epoch() + Duration::hours(hours)
}

pub(super) struct ConflictRepository;

impl ListingRepository for ConflictRepository {
    fn all(&self) -> Result<Vec<ListingRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<ListingRecord>, RepositoryError> {
        Ok(None)
    }

    fn insert(&self, _record: ListingRecord) -> Result<ListingRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn record_engagement(
        &self,
        _id: &ListingId,
        _kind: EngagementKind,
        _at: DateTime<Utc>,
    ) -> Result<ListingRecord, RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl ListingRepository for UnavailableRepository {
    fn all(&self) -> Result<Vec<ListingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<ListingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn insert(&self, _record: ListingRecord) -> Result<ListingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn record_engagement(
        &self,
        _id: &ListingId,
        _kind: EngagementKind,
        _at: DateTime<Utc>,
    ) -> Result<ListingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn ids(listings: &[ListingRecord]) -> Vec<&str> {
    listings.iter().map(|listing| listing.id.as_str()).collect()
}
