use super::domain::ListingRecord;
use super::import::{ListingImportError, ListingImporter};
use super::repository::ListingCatalog;

const DEMO_LISTINGS: &str = include_str!("../../data/demo_listings.csv");

/// The bundled Birmingham demo listings.
pub fn demo_listings() -> Result<Vec<ListingRecord>, ListingImportError> {
    ListingImporter::from_reader(DEMO_LISTINGS.as_bytes())
}

impl ListingCatalog {
    /// Catalog seeded with [`demo_listings`], used when no export is configured.
    pub fn demo() -> Result<Self, ListingImportError> {
        Ok(Self::from_listings(demo_listings()?))
    }
}
