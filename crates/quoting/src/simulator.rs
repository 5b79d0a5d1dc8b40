//! Stand-in for real carrier cost APIs.

use common::BoxType;

use crate::chance::FailureInjector;
use crate::request::QuoteRequest;

/// Per-lb rate for each box type.
fn box_rate(box_type: BoxType) -> i64 {
    match box_type {
        BoxType::Small => 3,
        BoxType::Medium => 5,
        BoxType::Big => 8,
    }
}

/// Deterministic cost for a request: weight times box rate, plus a
/// surcharge that grows with urgency.
pub fn estimate_cost(request: &QuoteRequest) -> i64 {
    let surcharge = (6 - i64::from(request.priority.value())) * 4;
    i64::from(request.weight) * box_rate(request.box_type) + surcharge
}

/// What the simulated carrier decided to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedResponse {
    /// HTTP 200 with a cost.
    Quoted { cost: i64 },
    /// An error status with no cost.
    Failed { status: u16 },
}

impl SimulatedResponse {
    /// HTTP status code to answer with.
    pub fn status(&self) -> u16 {
        match self {
            SimulatedResponse::Quoted { .. } => 200,
            SimulatedResponse::Failed { status } => *status,
        }
    }
}

/// Simulated carrier that randomly fails with HTTP 500.
#[derive(Debug, Clone)]
pub struct CarrierSimulator {
    outages: FailureInjector,
}

impl CarrierSimulator {
    pub fn new(outages: FailureInjector) -> Self {
        Self { outages }
    }

    /// Answers a quote request. Never fails in test mode.
    pub fn respond(&self, request: &QuoteRequest) -> SimulatedResponse {
        if self.outages.should_fail(request.test_mode) {
            SimulatedResponse::Failed { status: 500 }
        } else {
            SimulatedResponse::Quoted {
                cost: estimate_cost(request),
            }
        }
    }
}

impl Default for CarrierSimulator {
    fn default() -> Self {
        Self::new(FailureInjector::random(0.1))
    }
}
