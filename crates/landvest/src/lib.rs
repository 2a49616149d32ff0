//! Listing search and investment metrics for the LandVest platform.
//!
//! The [`listings`] module owns the listing catalog and the filter/sort/paginate
//! pipeline; [`investment`] holds the ROI estimator and the risk and portfolio
//! summaries that the dashboards consume.

pub mod config;
pub mod error;
pub mod investment;
pub mod listings;
pub mod telemetry;
