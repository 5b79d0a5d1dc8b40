//! Aggregated shipping cost endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use carrier_store::CarrierStore;
use quoting::{CostQuote, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Parses a request body as JSON; an empty body reads as `null`.
pub(crate) fn parse_body(body: &Bytes) -> Result<serde_json::Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))
}

/// POST /api/shipping/costs: quote a package with every enabled carrier.
#[tracing::instrument(skip(state, body))]
pub async fn quote<S: CarrierStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<Vec<CostQuote>>, ApiError> {
    let raw = parse_body(&body)?;

    let request = match state.validator.validate(&raw) {
        Ok(request) => request,
        Err(err) => {
            let outcome = match err {
                ValidationError::InvalidFields(_) => "invalid",
                ValidationError::Rejected(_) => "rejected",
            };
            metrics::counter!("quote_requests_total", "outcome" => outcome).increment(1);
            tracing::info!(error = %err, "quote request refused");
            return Err(err.into());
        }
    };

    metrics::counter!("quote_requests_total", "outcome" => "accepted").increment(1);
    let quotes = state.aggregator.quote(request).await?;

    Ok(Json(quotes))
}
