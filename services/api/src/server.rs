use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use landvest::config::AppConfig;
use landvest::error::AppError;
use landvest::investment::RoiEstimator;
use landvest::listings::ListingSearchService;
use landvest::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(&config.listings)?);
    match catalog.len() {
        Ok(count) => info!(listings = count, "listing catalog loaded"),
        Err(error) => warn!(%error, "listing catalog loaded but cannot be counted"),
    }
    let listing_service = Arc::new(ListingSearchService::new(catalog));
    let estimator = Arc::new(RoiEstimator::new(config.grading.policy()));

    let app = with_platform_routes(listing_service, estimator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "landvest api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
