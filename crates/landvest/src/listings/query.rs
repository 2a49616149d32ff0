//! Filter, sort and paginate a listing collection.
//!
//! [`run_query`] is a pure function: it never mutates the records it is given and
//! returns the same page for the same inputs. Every supplied criterion is AND-ed;
//! an absent criterion is never evaluated.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{LandType, ListingRecord, PlanningStatus};
use crate::investment::{InvestmentGrade, RiskLevel};

pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Inclusive asking-price bounds in whole pounds. Negative bounds are taken literally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl PriceRange {
    fn contains(&self, price: u64) -> bool {
        let price = i128::from(price);
        self.min.map_or(true, |min| price >= i128::from(min))
            && self.max.map_or(true, |max| price <= i128::from(max))
    }

    fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Inclusive size bounds in acres, whatever unit the listing is advertised in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SizeRange {
    fn contains(&self, acres: f64) -> bool {
        self.min.map_or(true, |min| acres >= min) && self.max.map_or(true, |max| acres <= max)
    }

    fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Price,
    Size,
    Roi,
    Views,
    Date,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "price" => Some(Self::Price),
            "size" => Some(Self::Size),
            "roi" => Some(Self::Roi),
            "views" | "viewcount" => Some(Self::Views),
            "date" | "created" | "createdat" => Some(Self::Date),
            _ => None,
        }
    }

    fn compare(self, a: &ListingRecord, b: &ListingRecord) -> Ordering {
        match self {
            Self::Price => a.price.cmp(&b.price),
            Self::Size => a.size_in_acres().total_cmp(&b.size_in_acres()),
            Self::Roi => a.expected_roi_percent.total_cmp(&b.expected_roi_percent),
            Self::Views => a.engagement.views.cmp(&b.engagement.views),
            Self::Date => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

/// 1-indexed page selection. A page below 1 reads as the first page; only the
/// page size is validated when the query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Result<Self, QueryError> {
        let request = Self {
            page: page.max(1),
            page_size,
        };
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), QueryError> {
        if self.page_size <= 0 {
            return Err(QueryError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    fn effective_page(&self) -> i64 {
        self.page.max(1)
    }

    fn bounds(&self) -> (u128, u128) {
        let size = self.page_size as u128;
        let start = (self.effective_page() as u128 - 1) * size;
        (start, start + size)
    }
}

/// Search criteria. Every field is optional; empty sets and blank text mean "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryCriteria {
    pub text: Option<String>,
    pub location: Option<String>,
    pub price: PriceRange,
    pub size: SizeRange,
    pub land_types: Vec<LandType>,
    pub planning_statuses: Vec<PlanningStatus>,
    pub grades: Vec<InvestmentGrade>,
    pub risk_levels: Vec<RiskLevel>,
    pub near_major_infrastructure: Option<bool>,
    pub featured: Option<bool>,
    pub sort: Option<SortSpec>,
    pub page: PageRequest,
}

impl QueryCriteria {
    pub fn matches(&self, record: &ListingRecord) -> bool {
        self.predicates().iter().all(|predicate| predicate(record))
    }

    /// Predicates for the criteria actually supplied.
    fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates: Vec<Predicate<'_>> = Vec::new();

        if let Some(needle) = lowered(&self.text) {
            predicates.push(Box::new(move |record: &ListingRecord| {
                contains_folded(&record.title, &needle)
                    || contains_folded(&record.description, &needle)
            }));
        }

        if let Some(needle) = lowered(&self.location) {
            predicates.push(Box::new(move |record: &ListingRecord| {
                contains_folded(&record.location, &needle)
                    || contains_folded(&record.postcode, &needle)
            }));
        }

        let price = self.price;
        if !price.is_unbounded() {
            predicates.push(Box::new(move |record: &ListingRecord| {
                price.contains(record.price)
            }));
        }

        let size = self.size;
        if !size.is_unbounded() {
            predicates.push(Box::new(move |record: &ListingRecord| {
                size.contains(record.size_in_acres())
            }));
        }

        let land_types = &self.land_types;
        if !land_types.is_empty() {
            predicates.push(Box::new(move |record: &ListingRecord| {
                land_types.contains(&record.land_type)
            }));
        }

        let planning_statuses = &self.planning_statuses;
        if !planning_statuses.is_empty() {
            predicates.push(Box::new(move |record: &ListingRecord| {
                planning_statuses.contains(&record.planning_status)
            }));
        }

        let grades = &self.grades;
        if !grades.is_empty() {
            predicates.push(Box::new(move |record: &ListingRecord| {
                grades.contains(&record.investment_grade())
            }));
        }

        let risk_levels = &self.risk_levels;
        if !risk_levels.is_empty() {
            predicates.push(Box::new(move |record: &ListingRecord| {
                risk_levels.contains(&record.risk_level)
            }));
        }

        if let Some(flag) = self.near_major_infrastructure {
            predicates.push(Box::new(move |record: &ListingRecord| {
                record.near_major_infrastructure == flag
            }));
        }

        if let Some(flag) = self.featured {
            predicates.push(Box::new(move |record: &ListingRecord| record.featured == flag));
        }

        predicates
    }
}

type Predicate<'a> = Box<dyn Fn(&ListingRecord) -> bool + 'a>;

fn lowered(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase)
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// One page of results plus what the caller needs to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    pub listings: Vec<ListingRecord>,
    pub total: usize,
    pub page: i64,
    pub page_size: i64,
    pub has_more: bool,
}

impl ListingPage {
    pub fn total_pages(&self) -> u64 {
        let total = self.total as u64;
        let size = self.page_size.max(1) as u64;
        total.div_ceil(size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("page size must be greater than zero (got {0})")]
    InvalidPageSize(i64),
}

/// Filter, sort and page `records` according to `criteria`.
pub fn run_query(
    records: &[ListingRecord],
    criteria: &QueryCriteria,
) -> Result<ListingPage, QueryError> {
    criteria.page.validate()?;

    let predicates = criteria.predicates();
    let mut matched: Vec<&ListingRecord> = records
        .iter()
        .filter(|record| predicates.iter().all(|predicate| predicate(*record)))
        .collect();

    if let Some(sort) = criteria.sort {
        matched.sort_by(|a, b| {
            let ordering = sort.key.compare(a, b);
            let ordering = match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
    }

    let total = matched.len();
    let (start, end) = criteria.page.bounds();
    let listings = if start >= total as u128 {
        Vec::new()
    } else {
        let end = end.min(total as u128) as usize;
        matched[start as usize..end]
            .iter()
            .map(|record| (*record).clone())
            .collect()
    };

    Ok(ListingPage {
        listings,
        total,
        page: criteria.page.effective_page(),
        page_size: criteria.page.page_size,
        has_more: end < total as u128,
    })
}
