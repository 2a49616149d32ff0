use serde::Deserialize;

use super::domain::{LandType, PlanningStatus};
use super::query::{
    PageRequest, PriceRange, QueryCriteria, QueryError, SizeRange, SortDirection, SortKey,
    SortSpec, DEFAULT_PAGE_SIZE,
};
use crate::investment::{InvestmentGrade, RiskLevel};

/// Raw search parameters as they arrive on the query string.
///
/// Everything is kept as text so that a malformed value never rejects the whole
/// request: values that fail to parse are dropped and the search runs without
/// that constraint. A page number below 1 reads as the first page. Only a page
/// size that parses to zero or below is an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQueryParams {
    #[serde(alias = "q")]
    pub query: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    #[serde(alias = "propertyType")]
    pub land_type: Option<String>,
    pub planning_status: Option<String>,
    #[serde(alias = "investmentGrade")]
    pub grade: Option<String>,
    pub risk_level: Option<String>,
    pub near_infrastructure: Option<String>,
    /// Legacy spelling of the infrastructure flag. Only `true` restricts;
    /// `false` leaves the search unconstrained.
    #[serde(rename = "hs2Only")]
    pub hs2_only: Option<String>,
    pub featured: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    #[serde(alias = "limit")]
    pub page_size: Option<String>,
}

impl ListingQueryParams {
    /// Collects raw query-string pairs. A repeated list key such as `landType`
    /// widens the set; for every other key the first value wins. Unknown keys
    /// are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" | "q" => &mut params.query,
                "location" => &mut params.location,
                "minPrice" => &mut params.min_price,
                "maxPrice" => &mut params.max_price,
                "minSize" => &mut params.min_size,
                "maxSize" => &mut params.max_size,
                "landType" | "propertyType" => {
                    widen(&mut params.land_type, value);
                    continue;
                }
                "planningStatus" => {
                    widen(&mut params.planning_status, value);
                    continue;
                }
                "grade" | "investmentGrade" => {
                    widen(&mut params.grade, value);
                    continue;
                }
                "riskLevel" => {
                    widen(&mut params.risk_level, value);
                    continue;
                }
                "nearInfrastructure" => &mut params.near_infrastructure,
                "hs2Only" => &mut params.hs2_only,
                "featured" => &mut params.featured,
                "sortBy" => &mut params.sort_by,
                "sortOrder" => &mut params.sort_order,
                "page" => &mut params.page,
                "pageSize" | "limit" => &mut params.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn into_criteria(self) -> Result<QueryCriteria, QueryError> {
        let page = parse_integer(self.page.as_deref())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        let page_size = parse_integer(self.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
        let page = PageRequest::new(page, page_size)?;

        let sort = self
            .sort_by
            .as_deref()
            .and_then(SortKey::parse)
            .map(|key| SortSpec {
                key,
                direction: self
                    .sort_order
                    .as_deref()
                    .and_then(SortDirection::parse)
                    .unwrap_or_default(),
            });

        Ok(QueryCriteria {
            text: non_blank(self.query),
            location: non_blank(self.location),
            price: PriceRange {
                min: parse_integer(self.min_price.as_deref()),
                max: parse_integer(self.max_price.as_deref()),
            },
            size: SizeRange {
                min: parse_decimal(self.min_size.as_deref()),
                max: parse_decimal(self.max_size.as_deref()),
            },
            land_types: parse_set(self.land_type.as_deref(), LandType::parse),
            planning_statuses: parse_set(self.planning_status.as_deref(), PlanningStatus::parse),
            grades: parse_set(self.grade.as_deref(), InvestmentGrade::parse),
            risk_levels: parse_set(self.risk_level.as_deref(), RiskLevel::parse),
            near_major_infrastructure: parse_flag(self.near_infrastructure.as_deref())
                .or_else(|| parse_flag(self.hs2_only.as_deref()).filter(|flag| *flag)),
            featured: parse_flag(self.featured.as_deref()),
            sort,
            page,
        })
    }
}

fn widen(slot: &mut Option<String>, value: String) {
    match slot {
        Some(existing) => {
            existing.push(',');
            existing.push_str(&value);
        }
        None => *slot = Some(value),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Whole numbers; a trailing fraction such as `250000.00` is truncated.
fn parse_integer(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim().replace([',', '£'], "");
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() < i64::MAX as f64)
        .map(|value| value.trunc() as i64)
}

fn parse_decimal(raw: Option<&str>) -> Option<f64> {
    raw?.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_set<T: PartialEq>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Vec<T> {
    let mut values = Vec::new();
    for value in raw.unwrap_or_default().split(',').filter_map(parse) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListingQueryParams {
        ListingQueryParams::default()
    }

    #[test]
    fn defaults_to_first_page_of_twelve() {
        let criteria = params().into_criteria().expect("defaults are valid");
        assert_eq!(criteria, QueryCriteria::default());
        assert_eq!(criteria.page.page, 1);
        assert_eq!(criteria.page.page_size, 12);
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        let criteria = ListingQueryParams {
            min_price: Some("cheap".to_string()),
            max_price: Some("£500,000".to_string()),
            min_size: Some("NaN".to_string()),
            page: Some("two".to_string()),
            page_size: Some("lots".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("lenient parsing");

        assert_eq!(criteria.price.min, None);
        assert_eq!(criteria.price.max, Some(500_000));
        assert_eq!(criteria.size.min, None);
        assert_eq!(criteria.page, PageRequest::default());
    }

    #[test]
    fn non_positive_page_falls_back_to_first() {
        for raw in ["0", "-3"] {
            let criteria = ListingQueryParams {
                page: Some(raw.to_string()),
                ..params()
            }
            .into_criteria()
            .expect("page numbers are never rejected");
            assert_eq!(criteria.page, PageRequest::default());
        }
    }

    #[test]
    fn non_positive_page_size_is_an_error() {
        let result = ListingQueryParams {
            page_size: Some("0".to_string()),
            ..params()
        }
        .into_criteria();

        assert_eq!(result, Err(QueryError::InvalidPageSize(0)));
    }

    #[test]
    fn negative_bounds_are_kept_literally() {
        let criteria = ListingQueryParams {
            max_price: Some("-10".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("negative bounds are not errors");

        assert_eq!(criteria.price.max, Some(-10));
    }

    #[test]
    fn sets_skip_unknown_values() {
        let criteria = ListingQueryParams {
            land_type: Some("mixed, castle,residential,mixed-use".to_string()),
            planning_status: Some("moon".to_string()),
            grade: Some("a,b".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("lenient parsing");

        assert_eq!(
            criteria.land_types,
            vec![LandType::MixedUse, LandType::Residential]
        );
        assert!(criteria.planning_statuses.is_empty());
        assert_eq!(
            criteria.grades,
            vec![InvestmentGrade::A, InvestmentGrade::B]
        );
    }

    #[test]
    fn infrastructure_flag_only_constrains_when_recognised() {
        let on = ListingQueryParams {
            near_infrastructure: Some("true".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert_eq!(on.near_major_infrastructure, Some(true));

        let junk = ListingQueryParams {
            near_infrastructure: Some("maybe".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert_eq!(junk.near_major_infrastructure, None);
    }

    #[test]
    fn hs2_only_false_does_not_restrict() {
        let off = ListingQueryParams {
            hs2_only: Some("false".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert_eq!(off.near_major_infrastructure, None);

        let on = ListingQueryParams {
            hs2_only: Some("true".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert_eq!(on.near_major_infrastructure, Some(true));

        let explicit = ListingQueryParams {
            near_infrastructure: Some("false".to_string()),
            hs2_only: Some("true".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert_eq!(explicit.near_major_infrastructure, Some(false));
    }

    #[test]
    fn repeated_keys_widen_sets_and_keep_first_scalar() {
        let pairs = [
            ("landType", "residential"),
            ("landType", "commercial"),
            ("minPrice", "100000"),
            ("minPrice", "500000"),
            ("limit", "5"),
            ("pageSize", "50"),
            ("colour", "green"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let criteria = ListingQueryParams::from_pairs(pairs)
            .into_criteria()
            .expect("duplicates are never rejected");

        assert_eq!(
            criteria.land_types,
            vec![LandType::Residential, LandType::Commercial]
        );
        assert_eq!(criteria.price.min, Some(100_000));
        assert_eq!(criteria.page.page_size, 5);
    }

    #[test]
    fn unknown_sort_key_leaves_input_order() {
        let criteria = ListingQueryParams {
            sort_by: Some("popularity".to_string()),
            sort_order: Some("desc".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert!(criteria.sort.is_none());

        let criteria = ListingQueryParams {
            sort_by: Some("price".to_string()),
            sort_order: Some("sideways".to_string()),
            ..params()
        }
        .into_criteria()
        .expect("valid");
        assert_eq!(
            criteria.sort,
            Some(SortSpec {
                key: SortKey::Price,
                direction: SortDirection::Ascending,
            })
        );
    }

    #[test]
    fn query_string_aliases_deserialize() {
        let params: ListingQueryParams =
            serde_json::from_value(serde_json::json!({
                "q": "canal",
                "hs2Only": "true",
                "limit": "5",
                "minPrice": "100000"
            }))
            .expect("aliases accepted");

        assert_eq!(params.query.as_deref(), Some("canal"));
        assert_eq!(params.hs2_only.as_deref(), Some("true"));
        assert_eq!(params.page_size.as_deref(), Some("5"));
        assert_eq!(params.min_price.as_deref(), Some("100000"));
    }
}
