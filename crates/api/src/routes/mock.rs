//! Mock carrier cost endpoint.
//!
//! Answers like a carrier API would, failing at random unless `test_mode` is
//! set. The aggregator reaches it over HTTP like any other carrier.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use carrier_store::{CarrierCode, CarrierStore, CarrierStoreExt};
use quoting::{SimulatedResponse, parse_quote_request};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::routes::costs::parse_body;
use crate::state::AppState;

/// POST /mock/{carrier_code}/shippingcost: simulated carrier quote.
#[tracing::instrument(skip(state, body))]
pub async fn shipping_cost<S: CarrierStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(carrier_code): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let code = CarrierCode::from_name(&carrier_code);
    if state.carriers.find_by_code(&code).await?.is_none() {
        return Err(ApiError::NotFound(format!("Unknown carrier: {code}")));
    }

    let request = parse_quote_request(&parse_body(&body)?)?;
    let response = state.simulator.respond(&request);
    let status = StatusCode::from_u16(response.status())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut payload = json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "request_data": request,
    });
    match response {
        SimulatedResponse::Quoted { cost } => {
            payload["error_code"] = json!(0);
            payload["reason"] = json!("OK");
            payload["cost"] = json!(cost);
        }
        SimulatedResponse::Failed { status } => {
            payload["error_code"] = json!(status);
            payload["reason"] = json!(format!("Error {status}"));
        }
    }

    tracing::debug!(carrier = %code, status = response.status(), "mock carrier answered");
    Ok((status, Json(payload)))
}
