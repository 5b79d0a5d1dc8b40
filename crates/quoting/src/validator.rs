//! Validation of incoming quote requests.
//!
//! Every field is checked before reporting, so a rejected request lists all
//! offending fields at once.

use std::collections::BTreeMap;

use common::{BoxType, Priority};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::chance::FailureInjector;
use crate::request::QuoteRequest;

const ADDRESS_HELP: &str = "Destination to calculate shipment costs for";
const WEIGHT_HELP: &str = "Weight of the package in lb";
const PRIORITY_HELP: &str = "Valid values: 1 (top) to 5 (least)";
const BOX_TYPE_HELP: &str = "Valid values: small, medium, big";
const TEST_MODE_HELP: &str = "Disables randomized failures when true";

/// Message returned when the simulated business rules reject a request.
pub const REJECTED_MESSAGE: &str = "The package cannot be shipped with the requested options";

/// Why a quote request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields are missing or malformed, keyed by field name.
    #[error("Invalid fields: {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
    InvalidFields(BTreeMap<&'static str, &'static str>),

    /// The request was well-formed but refused by business rules.
    #[error("{0}")]
    Rejected(String),
}

impl ValidationError {
    /// Returns the offending field names, empty for business-rule rejections.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::InvalidFields(fields) => fields.keys().copied().collect(),
            ValidationError::Rejected(_) => Vec::new(),
        }
    }
}

/// Parses and type-checks a raw request body without any business rules.
pub fn parse_quote_request(body: &Value) -> Result<QuoteRequest, ValidationError> {
    let empty = Map::new();
    let object = body.as_object().unwrap_or(&empty);
    let mut invalid = BTreeMap::new();

    let address = object
        .get("address")
        .and_then(Value::as_str)
        .filter(|a| !a.trim().is_empty());
    if address.is_none() {
        invalid.insert("address", ADDRESS_HELP);
    }

    let weight = object
        .get("weight")
        .and_then(Value::as_u64)
        .filter(|w| *w > 0)
        .and_then(|w| u32::try_from(w).ok());
    if weight.is_none() {
        invalid.insert("weight", WEIGHT_HELP);
    }

    let priority = object
        .get("priority")
        .and_then(Value::as_i64)
        .and_then(Priority::new);
    if priority.is_none() {
        invalid.insert("priority", PRIORITY_HELP);
    }

    let box_type = object
        .get("box_type")
        .and_then(Value::as_str)
        .and_then(|b| b.parse::<BoxType>().ok());
    if box_type.is_none() {
        invalid.insert("box_type", BOX_TYPE_HELP);
    }

    let test_mode = match object.get("test_mode") {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(flag)) => Some(*flag),
        Some(_) => None,
    };
    if test_mode.is_none() {
        invalid.insert("test_mode", TEST_MODE_HELP);
    }

    match (address, weight, priority, box_type, test_mode) {
        (Some(address), Some(weight), Some(priority), Some(box_type), Some(test_mode)) => {
            Ok(QuoteRequest {
                address: address.to_string(),
                weight,
                priority,
                box_type,
                test_mode,
            })
        }
        _ => Err(ValidationError::InvalidFields(invalid)),
    }
}

/// Validates quote requests before any carrier is contacted.
///
/// Field checks run first. A well-formed request is then put through the
/// simulated business rules (address coverage, weight against box type),
/// which reject at random unless `test_mode` is set.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    business_rules: FailureInjector,
}

impl RequestValidator {
    /// Creates a validator whose business rules fail per `business_rules`.
    pub fn new(business_rules: FailureInjector) -> Self {
        Self { business_rules }
    }

    /// Validates a raw request body.
    pub fn validate(&self, body: &Value) -> Result<QuoteRequest, ValidationError> {
        let request = parse_quote_request(body)?;

        if self.business_rules.should_fail(request.test_mode) {
            tracing::debug!(address = %request.address, "request rejected by business rules");
            return Err(ValidationError::Rejected(REJECTED_MESSAGE.to_string()));
        }

        Ok(request)
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new(FailureInjector::random(0.3))
    }
}
