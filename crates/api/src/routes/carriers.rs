//! Carrier listing endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use carrier_store::{Carrier, CarrierStore};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a carrier; credentials and endpoint are never exposed.
#[derive(Serialize)]
pub struct CarrierResponse {
    pub code: String,
    pub name: String,
    pub shipment_methods: BTreeMap<String, String>,
    pub enabled: bool,
}

impl From<Carrier> for CarrierResponse {
    fn from(carrier: Carrier) -> Self {
        Self {
            code: carrier.code.to_string(),
            name: carrier.name,
            shipment_methods: carrier.shipment_methods,
            enabled: carrier.enabled,
        }
    }
}

/// GET /api/shipping/carriers: list every configured carrier.
#[tracing::instrument(skip(state))]
pub async fn list<S: CarrierStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CarrierResponse>>, ApiError> {
    let carriers = state.carriers.list().await?;
    Ok(Json(carriers.into_iter().map(CarrierResponse::from).collect()))
}
