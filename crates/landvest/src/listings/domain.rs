use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::investment::{InvestmentGrade, RiskLevel};

pub const ACRES_PER_HECTARE: f64 = 2.471_05;
pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// Identifier wrapper for listings. Opaque to everything but ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeUnit {
    Acres,
    Hectares,
    SquareFeet,
}

impl SizeUnit {
    pub fn to_acres(self, size: f64) -> f64 {
        match self {
            Self::Acres => size,
            Self::Hectares => size * ACRES_PER_HECTARE,
            Self::SquareFeet => size / SQUARE_FEET_PER_ACRE,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Acres => "acres",
            Self::Hectares => "hectares",
            Self::SquareFeet => "sq ft",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "acres" | "acre" | "ac" => Some(Self::Acres),
            "hectares" | "hectare" | "ha" => Some(Self::Hectares),
            "square-feet" | "sqft" | "sq-ft" | "ft2" => Some(Self::SquareFeet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandType {
    Residential,
    Commercial,
    MixedUse,
    Industrial,
    Agricultural,
    Brownfield,
    Greenfield,
    Development,
    Strategic,
}

impl LandType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential Development",
            Self::Commercial => "Commercial",
            Self::MixedUse => "Mixed Use",
            Self::Industrial => "Industrial",
            Self::Agricultural => "Agricultural",
            Self::Brownfield => "Brownfield",
            Self::Greenfield => "Greenfield",
            Self::Development => "Development",
            Self::Strategic => "Strategic Land",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "residential" => Some(Self::Residential),
            "commercial" => Some(Self::Commercial),
            "mixed-use" | "mixed" | "mixeduse" => Some(Self::MixedUse),
            "industrial" => Some(Self::Industrial),
            "agricultural" => Some(Self::Agricultural),
            "brownfield" => Some(Self::Brownfield),
            "greenfield" => Some(Self::Greenfield),
            "development" => Some(Self::Development),
            "strategic" => Some(Self::Strategic),
            _ => None,
        }
    }
}

/// Local-council approval stage of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanningStatus {
    NoApplication,
    PreApplication,
    Pending,
    Approved,
    Rejected,
}

impl PlanningStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoApplication => "No Application",
            Self::PreApplication => "Pre-Application",
            Self::Pending => "Application Pending",
            Self::Approved => "Planning Approved",
            Self::Rejected => "Planning Rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "no-application" | "none" => Some(Self::NoApplication),
            "pre-application" | "pre-app" | "preapp" => Some(Self::PreApplication),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" | "refused" => Some(Self::Rejected),
            _ => None,
        }
    }
}

fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace([' ', '_'], "-")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// View, save and offer counts. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounters {
    pub views: u64,
    pub saves: u64,
    pub offers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    View,
    Save,
    Offer,
}

impl EngagementCounters {
    pub fn record(&mut self, kind: EngagementKind) {
        let counter = match kind {
            EngagementKind::View => &mut self.views,
            EngagementKind::Save => &mut self.saves,
            EngagementKind::Offer => &mut self.offers,
        };
        *counter = counter.saturating_add(1);
    }
}

/// One land parcel offered for investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub postcode: String,
    pub coordinates: Coordinates,
    /// Asking price in whole pounds.
    pub price: u64,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub land_type: LandType,
    pub planning_status: PlanningStatus,
    pub planning_score: u8,
    pub expected_roi_percent: f64,
    pub near_major_infrastructure: bool,
    pub featured: bool,
    pub risk_level: RiskLevel,
    pub engagement: EngagementCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingRecord {
    pub fn investment_grade(&self) -> InvestmentGrade {
        InvestmentGrade::from_roi(self.expected_roi_percent)
    }

    /// Asking price per unit of the listing's own size unit.
    pub fn price_per_unit_area(&self) -> f64 {
        self.price as f64 / self.size
    }

    pub fn size_in_acres(&self) -> f64 {
        self.size_unit.to_acres(self.size)
    }

    pub fn price_per_acre(&self) -> f64 {
        self.price as f64 / self.size_in_acres()
    }

    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(ListingValidationError::MissingField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(ListingValidationError::MissingField("title"));
        }
        if self.location.trim().is_empty() {
            return Err(ListingValidationError::MissingField("location"));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ListingValidationError::NonPositiveSize(self.size));
        }
        if self.planning_score > 100 {
            return Err(ListingValidationError::PlanningScoreOutOfRange(
                self.planning_score,
            ));
        }
        if !self.expected_roi_percent.is_finite() {
            return Err(ListingValidationError::NonFiniteRoi);
        }
        if !self.coordinates.latitude.is_finite()
            || !self.coordinates.longitude.is_finite()
            || self.coordinates.latitude.abs() > 90.0
            || self.coordinates.longitude.abs() > 180.0
        {
            return Err(ListingValidationError::InvalidCoordinates);
        }
        if self.updated_at < self.created_at {
            return Err(ListingValidationError::UpdatedBeforeCreated);
        }
        Ok(())
    }

    /// Apply an engagement event and refresh `updated_at` without moving it backwards.
    pub fn record_engagement(&mut self, kind: EngagementKind, at: DateTime<Utc>) {
        self.engagement.record(kind);
        if at > self.updated_at {
            self.updated_at = at;
        }
    }

    pub fn detail_view(&self) -> ListingDetailView {
        ListingDetailView {
            investment_grade: self.investment_grade(),
            price_per_unit_area: self.price_per_unit_area(),
            price_per_acre: self.price_per_acre(),
            size_in_acres: self.size_in_acres(),
            listing: self.clone(),
        }
    }
}

/// Listing plus the derived metrics the property page displays.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetailView {
    #[serde(flatten)]
    pub listing: ListingRecord,
    pub investment_grade: InvestmentGrade,
    pub price_per_unit_area: f64,
    pub price_per_acre: f64,
    pub size_in_acres: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("size must be a positive number (got {0})")]
    NonPositiveSize(f64),
    #[error("planning score must be between 0 and 100 (got {0})")]
    PlanningScoreOutOfRange(u8),
    #[error("expected ROI must be a finite number")]
    NonFiniteRoi,
    #[error("coordinates must be a valid latitude/longitude pair")]
    InvalidCoordinates,
    #[error("updated_at must not precede created_at")]
    UpdatedBeforeCreated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ListingRecord {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        ListingRecord {
            id: ListingId("eastside-prime".to_string()),
            title: "Prime Development Land".to_string(),
            description: "Development opportunity beside the new terminus".to_string(),
            location: "Birmingham Eastside".to_string(),
            postcode: "B9 4AA".to_string(),
            coordinates: Coordinates {
                latitude: 52.4862,
                longitude: -1.8904,
            },
            price: 450_000,
            size: 2.5,
            size_unit: SizeUnit::Acres,
            land_type: LandType::MixedUse,
            planning_status: PlanningStatus::PreApplication,
            planning_score: 82,
            expected_roi_percent: 32.0,
            near_major_infrastructure: true,
            featured: true,
            risk_level: RiskLevel::Low,
            engagement: EngagementCounters::default(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn grade_is_derived_from_roi() {
        let mut listing = record();
        assert_eq!(listing.investment_grade(), InvestmentGrade::B);
        listing.expected_roi_percent = 51.0;
        assert_eq!(listing.investment_grade(), InvestmentGrade::A);
    }

    #[test]
    fn price_per_area_uses_listing_unit() {
        let mut listing = record();
        assert_eq!(listing.price_per_unit_area(), 180_000.0);

        listing.size = 1.0;
        listing.size_unit = SizeUnit::Hectares;
        assert_eq!(listing.price_per_unit_area(), 450_000.0);
        assert!((listing.price_per_acre() - 450_000.0 / ACRES_PER_HECTARE).abs() < 1e-6);
    }

    #[test]
    fn validation_rejects_broken_invariants() {
        let mut listing = record();
        listing.size = 0.0;
        assert_eq!(
            listing.validate(),
            Err(ListingValidationError::NonPositiveSize(0.0))
        );

        let mut listing = record();
        listing.planning_score = 101;
        assert_eq!(
            listing.validate(),
            Err(ListingValidationError::PlanningScoreOutOfRange(101))
        );

        let mut listing = record();
        listing.updated_at = listing.created_at - chrono::Duration::days(1);
        assert_eq!(
            listing.validate(),
            Err(ListingValidationError::UpdatedBeforeCreated)
        );

        assert!(record().validate().is_ok());
    }

    #[test]
    fn engagement_only_moves_forward() {
        let mut listing = record();
        let earlier = listing.created_at - chrono::Duration::hours(2);

        listing.record_engagement(EngagementKind::View, earlier);
        listing.record_engagement(EngagementKind::Offer, earlier);

        assert_eq!(listing.engagement.views, 1);
        assert_eq!(listing.engagement.offers, 1);
        assert_eq!(listing.engagement.saves, 0);
        assert_eq!(listing.updated_at, listing.created_at);
    }

    #[test]
    fn enum_parsing_accepts_legacy_aliases() {
        assert_eq!(LandType::parse("mixed"), Some(LandType::MixedUse));
        assert_eq!(LandType::parse("Mixed Use"), Some(LandType::MixedUse));
        assert_eq!(
            PlanningStatus::parse("pre-app"),
            Some(PlanningStatus::PreApplication)
        );
        assert_eq!(SizeUnit::parse("sqft"), Some(SizeUnit::SquareFeet));
        assert_eq!(LandType::parse("castle"), None);
    }

    #[test]
    fn detail_view_flattens_listing_fields() {
        let value = serde_json::to_value(record().detail_view()).expect("serializes");
        assert_eq!(value["id"], serde_json::json!("eastside-prime"));
        assert_eq!(value["investment_grade"], serde_json::json!("B"));
        assert_eq!(value["land_type"], serde_json::json!("mixed-use"));
        assert_eq!(value["planning_status"], serde_json::json!("pre-application"));
    }
}
