use std::sync::Arc;

use async_trait::async_trait;

use crate::{Carrier, CarrierCode, NewCarrier, Result};

/// Core trait for carrier directory implementations.
///
/// Listing order is insertion order (ascending id) for every backend.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CarrierStore: Send + Sync {
    /// Returns every carrier, enabled or not.
    async fn list(&self) -> Result<Vec<Carrier>>;

    /// Returns only carriers with the enabled flag set.
    async fn list_enabled(&self) -> Result<Vec<Carrier>>;

    /// Stores a new carrier.
    ///
    /// Fails with `DuplicateCode` if another carrier normalizes to the
    /// same code.
    async fn insert(&self, carrier: NewCarrier) -> Result<Carrier>;

    /// Returns the number of stored carriers.
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
impl<T: CarrierStore + ?Sized> CarrierStore for Arc<T> {
    async fn list(&self) -> Result<Vec<Carrier>> {
        (**self).list().await
    }

    async fn list_enabled(&self) -> Result<Vec<Carrier>> {
        (**self).list_enabled().await
    }

    async fn insert(&self, carrier: NewCarrier) -> Result<Carrier> {
        (**self).insert(carrier).await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}

/// Extension trait providing convenience methods for carrier stores.
#[async_trait]
pub trait CarrierStoreExt: CarrierStore {
    /// Checks if the directory holds no carriers.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.count().await? == 0)
    }

    /// Looks up a carrier by its normalized code.
    async fn find_by_code(&self, code: &CarrierCode) -> Result<Option<Carrier>> {
        Ok(self.list().await?.into_iter().find(|c| &c.code == code))
    }
}

impl<T: CarrierStore + ?Sized> CarrierStoreExt for T {}
