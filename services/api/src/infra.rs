use chrono::NaiveDate;
use landvest::config::ListingsConfig;
use landvest::error::AppError;
use landvest::listings::{demo_listings, ListingCatalog, ListingImporter, ListingRecord};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog from the configured export, or the bundled demo listings.
pub(crate) fn load_catalog(config: &ListingsConfig) -> Result<ListingCatalog, AppError> {
    load_catalog_from(config.catalog_csv.as_deref())
}

pub(crate) fn load_catalog_from(path: Option<&Path>) -> Result<ListingCatalog, AppError> {
    Ok(ListingCatalog::from_listings(load_listings(path)?))
}

pub(crate) fn load_listings(path: Option<&Path>) -> Result<Vec<ListingRecord>, AppError> {
    let listings = match path {
        Some(path) => {
            let listings = ListingImporter::from_path(path)?;
            info!(path = %path.display(), count = listings.len(), "loaded listing export");
            listings
        }
        None => demo_listings()?,
    };
    Ok(listings)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Whole pounds with thousands separators, e.g. `£1,250,000`.
pub(crate) fn format_gbp(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if amount < 0 {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

pub(crate) fn format_gbp_f64(amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }
    format_gbp(amount.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
}
