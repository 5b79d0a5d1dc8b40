use common::{BoxType, CarrierCode, Priority};
use serde::{Deserialize, Serialize};

/// A validated shipping cost request.
///
/// Forwarded as-is to every carrier endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Destination address, free text.
    pub address: String,
    /// Package weight in lb.
    pub weight: u32,
    pub priority: Priority,
    pub box_type: BoxType,
    /// Disables randomized failures end to end.
    #[serde(default)]
    pub test_mode: bool,
}

/// One carrier's answer in an aggregated quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostQuote {
    pub carrier: CarrierCode,
    /// Empty when the carrier returned a cost.
    pub error: String,
    /// [`CostQuote::UNAVAILABLE`] when the carrier did not return a cost.
    pub cost: i64,
}

impl CostQuote {
    /// Cost reported when a carrier could not quote.
    pub const UNAVAILABLE: i64 = -1;

    pub fn success(carrier: CarrierCode, cost: i64) -> Self {
        Self {
            carrier,
            error: String::new(),
            cost,
        }
    }

    pub fn failure(carrier: CarrierCode, error: impl Into<String>) -> Self {
        Self {
            carrier,
            error: error.into(),
            cost: Self::UNAVAILABLE,
        }
    }
}
