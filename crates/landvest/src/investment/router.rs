use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::portfolio::{PortfolioHolding, PortfolioSummary};
use super::risk::{default_site_profile, RiskFactor, RiskSummary};
use super::roi::{RoiEstimator, RoiInputs};

#[derive(Debug, Deserialize)]
pub struct RoiRequest {
    #[serde(flatten)]
    pub inputs: RoiInputs,
    #[serde(default)]
    pub risk_score: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RiskRequest {
    /// Omitted factors fall back to the baseline site profile.
    #[serde(default)]
    pub factors: Option<Vec<RiskFactor>>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub holdings: Vec<PortfolioHolding>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Router builder exposing the calculator endpoints.
pub fn investment_router(estimator: Arc<RoiEstimator>) -> Router {
    Router::new()
        .route("/api/v1/investment/roi", post(roi_handler))
        .route("/api/v1/investment/risk", post(risk_handler))
        .route("/api/v1/investment/portfolio", post(portfolio_handler))
        .with_state(estimator)
}

pub(crate) async fn roi_handler(
    State(estimator): State<Arc<RoiEstimator>>,
    Json(request): Json<RoiRequest>,
) -> Response {
    match estimator.estimate_with_risk(&request.inputs, request.risk_score) {
        Ok(result) => {
            debug!(grade = %result.investment_grade, "roi estimate computed");
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn risk_handler(Json(request): Json<RiskRequest>) -> Response {
    let factors = request.factors.unwrap_or_else(default_site_profile);
    match RiskSummary::from_factors(factors) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn portfolio_handler(Json(request): Json<PortfolioRequest>) -> Response {
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    match PortfolioSummary::build(&request.holdings, today) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}
