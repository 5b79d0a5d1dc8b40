//! Shared value types used across the shipping quote crates.

pub mod types;

pub use types::{BoxType, CarrierCode, Priority};
