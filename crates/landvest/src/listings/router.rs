use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{EngagementKind, ListingId};
use super::params::ListingQueryParams;
use super::repository::{ListingRepository, RepositoryError};
use super::service::{ListingSearchService, ListingServiceError, NewListing};

#[derive(Debug, Deserialize)]
pub struct EngagementRequest {
    pub kind: EngagementKind,
}

/// Router builder exposing listing search, detail, creation and engagement endpoints.
pub fn listing_router<R>(service: Arc<ListingSearchService<R>>) -> Router
where
    R: ListingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings",
            get(search_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/listings/:listing_id", get(detail_handler::<R>))
        .route(
            "/api/v1/listings/:listing_id/engagement",
            post(engagement_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<ListingSearchService<R>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let result = ListingQueryParams::from_pairs(pairs)
        .into_criteria()
        .map_err(ListingServiceError::from)
        .and_then(|criteria| service.search(&criteria));

    match result {
        Ok(page) => {
            let payload = json!({
                "total_pages": page.total_pages(),
                "listings": page.listings,
                "total": page.total,
                "page": page.page,
                "page_size": page.page_size,
                "has_more": page.has_more,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ListingSearchService<R>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let id = ListingId(listing_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record.detail_view())).into_response(),
        Err(ListingServiceError::Repository(RepositoryError::NotFound)) => {
            not_found(&id)
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ListingSearchService<R>>>,
    Json(listing): Json<NewListing>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match service.create(listing) {
        Ok(record) => (StatusCode::CREATED, Json(record.detail_view())).into_response(),
        Err(ListingServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "listing already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn engagement_handler<R>(
    State(service): State<Arc<ListingSearchService<R>>>,
    Path(listing_id): Path<String>,
    Json(request): Json<EngagementRequest>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let id = ListingId(listing_id);
    match service.record_engagement(&id, request.kind) {
        Ok(record) => {
            let payload = json!({
                "listing_id": record.id,
                "engagement": record.engagement,
                "updated_at": record.updated_at,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ListingServiceError::Repository(RepositoryError::NotFound)) => {
            not_found(&id)
        }
        Err(other) => error_response(other),
    }
}

fn not_found(id: &ListingId) -> Response {
    let payload = json!({
        "error": format!("listing '{id}' not found"),
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn error_response(error: ListingServiceError) -> Response {
    let status = match &error {
        ListingServiceError::Query(_) => StatusCode::BAD_REQUEST,
        ListingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ListingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ListingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ListingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
