//! HTTP API server for multi-carrier shipping quotes.
//!
//! Exposes the carrier list, the aggregated cost endpoint and a mock carrier
//! endpoint, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use carrier_store::CarrierStore;
use metrics_exporter_prometheus::PrometheusHandle;
use quoting::{CarrierSimulator, FailureInjector, HttpCarrierClient, RequestValidator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CarrierStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health::<S>))
        .route("/api/shipping/carriers", get(routes::carriers::list::<S>))
        .route("/api/shipping/costs", post(routes::costs::quote::<S>))
        .route(
            "/mock/{carrier_code}/shippingcost",
            post(routes::mock::shipping_cost::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state from configuration.
pub fn create_state<S: CarrierStore + Clone + 'static>(
    carriers: S,
    config: &Config,
) -> Result<Arc<AppState<S>>, quoting::CarrierCallError> {
    let client = HttpCarrierClient::new(config.carrier_timeout())?;
    let validator = RequestValidator::new(FailureInjector::random(config.validation_rejection_rate));
    let simulator = CarrierSimulator::new(FailureInjector::random(config.mock_failure_rate));

    Ok(Arc::new(AppState::new(carriers, client, validator, simulator)))
}
