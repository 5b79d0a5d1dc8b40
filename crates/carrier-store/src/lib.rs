//! Carrier directory for the shipping quote service.
//!
//! Holds carrier records (credentials, shipment methods, endpoint) behind the
//! [`CarrierStore`] trait, with an in-memory backend for tests and local runs
//! and a PostgreSQL backend for deployments.

pub mod carrier;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use carrier::{Carrier, NewCarrier};
pub use common::CarrierCode;
pub use error::{CarrierStoreError, Result};
pub use memory::InMemoryCarrierStore;
pub use postgres::PostgresCarrierStore;
pub use seed::{SeedOutcome, bootstrap, default_carriers};
pub use store::{CarrierStore, CarrierStoreExt};
