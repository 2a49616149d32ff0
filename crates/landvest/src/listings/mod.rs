//! Land listings: the catalog, CSV ingestion, and the search pipeline behind
//! the listings page.
//!
//! [`query::run_query`] is the core: a pure filter/sort/paginate pass over a
//! snapshot of the catalog. [`ListingQueryParams`] is the forgiving front end
//! that turns raw query-string text into [`QueryCriteria`].

pub mod domain;
pub mod import;
pub mod params;
pub mod query;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Coordinates, EngagementCounters, EngagementKind, LandType, ListingDetailView, ListingId,
    ListingRecord, ListingValidationError, PlanningStatus, SizeUnit,
};
pub use import::{ListingImportError, ListingImporter};
pub use params::ListingQueryParams;
pub use query::{
    run_query, ListingPage, PageRequest, PriceRange, QueryCriteria, QueryError, SizeRange,
    SortDirection, SortKey, SortSpec, DEFAULT_PAGE_SIZE,
};
pub use repository::{ListingCatalog, ListingRepository, RepositoryError};
pub use router::listing_router;
pub use seed::demo_listings;
pub use service::{ListingSearchService, ListingServiceError, NewListing};
