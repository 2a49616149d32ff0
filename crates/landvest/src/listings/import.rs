use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{
    Coordinates, EngagementCounters, LandType, ListingId, ListingRecord, ListingValidationError,
    PlanningStatus, SizeUnit,
};
use crate::investment::RiskLevel;

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognised {field} '{value}'")]
    UnknownValue {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: invalid timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
    #[error("row {row}: {source}")]
    Invalid {
        row: usize,
        source: ListingValidationError,
    },
    #[error("row {row}: duplicate listing id '{id}'")]
    DuplicateId { row: usize, id: String },
}

/// Loads listings exported by the ingestion job.
pub struct ListingImporter;

impl ListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ListingRecord>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse and validate every row. The first bad row aborts the import.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ListingRecord>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut listings = Vec::new();

        for (index, row) in csv_reader.deserialize::<ListingRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let listing = row?.into_record(line)?;

            if !seen.insert(listing.id.clone()) {
                return Err(ListingImportError::DuplicateId {
                    row: line,
                    id: listing.id.0,
                });
            }

            listings.push(listing);
        }

        Ok(listings)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    location: String,
    #[serde(default)]
    postcode: String,
    latitude: f64,
    longitude: f64,
    price: u64,
    size: f64,
    size_unit: String,
    land_type: String,
    planning_status: String,
    planning_score: u8,
    expected_roi: f64,
    #[serde(default, deserialize_with = "flexible_bool")]
    near_infrastructure: bool,
    #[serde(default, deserialize_with = "flexible_bool")]
    featured: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    risk_level: Option<String>,
    #[serde(default)]
    views: Option<u64>,
    #[serde(default)]
    saves: Option<u64>,
    #[serde(default)]
    offers: Option<u64>,
    created_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
}

impl ListingRow {
    fn into_record(self, row: usize) -> Result<ListingRecord, ListingImportError> {
        let unknown = |field: &'static str, value: &str| ListingImportError::UnknownValue {
            row,
            field,
            value: value.to_string(),
        };

        let size_unit =
            SizeUnit::parse(&self.size_unit).ok_or_else(|| unknown("size_unit", &self.size_unit))?;
        let land_type =
            LandType::parse(&self.land_type).ok_or_else(|| unknown("land_type", &self.land_type))?;
        let planning_status = PlanningStatus::parse(&self.planning_status)
            .ok_or_else(|| unknown("planning_status", &self.planning_status))?;
        let risk_level = match self.risk_level.as_deref() {
            Some(raw) => RiskLevel::parse(raw).ok_or_else(|| unknown("risk_level", raw))?,
            None => RiskLevel::Medium,
        };

        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            ListingImportError::InvalidTimestamp {
                row,
                value: self.created_at.clone(),
            }
        })?;
        let updated_at = match self.updated_at.as_deref() {
            Some(raw) => {
                parse_timestamp(raw).ok_or_else(|| ListingImportError::InvalidTimestamp {
                    row,
                    value: raw.to_string(),
                })?
            }
            None => created_at,
        };

        let record = ListingRecord {
            id: ListingId(self.id),
            title: self.title,
            description: self.description,
            location: self.location,
            postcode: self.postcode,
            coordinates: Coordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            price: self.price,
            size: self.size,
            size_unit,
            land_type,
            planning_status,
            planning_score: self.planning_score,
            expected_roi_percent: self.expected_roi,
            near_major_infrastructure: self.near_infrastructure,
            featured: self.featured,
            risk_level,
            engagement: EngagementCounters {
                views: self.views.unwrap_or_default(),
                saves: self.saves.unwrap_or_default(),
                offers: self.offers.unwrap_or_default(),
            },
            created_at,
            updated_at,
        };

        record
            .validate()
            .map_err(|source| ListingImportError::Invalid { row, source })?;

        Ok(record)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "n" => Ok(false),
        "true" | "1" | "yes" | "y" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean, found '{other}'"
        ))),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
