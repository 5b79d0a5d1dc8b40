//! Quote validation and aggregation for the shipping quote service.
//!
//! This crate provides:
//! - Request validation with field-level error collection
//! - Injectable failure simulation for business rules and mock carriers
//! - An HTTP client for carrier cost endpoints
//! - The cost aggregator that queries every enabled carrier in turn

pub mod aggregator;
pub mod chance;
pub mod client;
pub mod error;
pub mod request;
pub mod simulator;
pub mod validator;

pub use aggregator::{CostAggregator, interpret_response};
pub use chance::{Chance, FailureInjector, FixedChance, RandomChance};
pub use client::{CarrierCallError, CarrierClient, CarrierResponse, HttpCarrierClient};
pub use error::QuotingError;
pub use request::{CostQuote, QuoteRequest};
pub use simulator::{CarrierSimulator, SimulatedResponse, estimate_cost};
pub use validator::{RequestValidator, ValidationError, parse_quote_request};
