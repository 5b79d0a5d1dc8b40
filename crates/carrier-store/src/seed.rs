//! Built-in carrier list and idempotent directory bootstrap.

use crate::{CarrierStore, CarrierStoreError, NewCarrier, Result};

/// What [`bootstrap`] did to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The directory was empty and this many carriers were inserted.
    Seeded(usize),
    /// The directory already held carriers, or another instance seeded it
    /// concurrently.
    AlreadyPopulated,
    /// The backing table does not exist yet; nothing was inserted.
    NotMigrated,
}

/// Returns the built-in carriers, each pointing at the mock carrier
/// endpoint served under `base_url`.
pub fn default_carriers(base_url: &str) -> Vec<NewCarrier> {
    let base_url = base_url.trim_end_matches('/');
    let endpoint = |code: &str| format!("{base_url}/mock/{code}/shippingcost");

    vec![
        NewCarrier::new("Fedex", endpoint("fedex"))
            .credentials("FEDEXID", "FEDEXTKN")
            .shipment_method("cheap", "fdxchp")
            .shipment_method("regular", "fdxreg")
            .shipment_method("express", "fdxexp"),
        NewCarrier::new("UPS", endpoint("ups"))
            .credentials("UPSID", "UPSTKN")
            .shipment_method("cheap", "upschp")
            .shipment_method("regular", "upsreg")
            .shipment_method("express", "upsexp"),
    ]
}

/// Seeds an empty directory.
///
/// Safe to call on every startup: a populated directory is left untouched,
/// and a directory whose table has not been created yet is skipped.
#[tracing::instrument(skip_all, fields(seeds = seeds.len()))]
pub async fn bootstrap<S>(store: &S, seeds: Vec<NewCarrier>) -> Result<SeedOutcome>
where
    S: CarrierStore + ?Sized,
{
    let existing = match store.count().await {
        Ok(count) => count,
        Err(CarrierStoreError::NotMigrated) => {
            tracing::warn!("carrier table missing, skipping seed");
            return Ok(SeedOutcome::NotMigrated);
        }
        Err(e) => return Err(e),
    };

    if existing > 0 {
        tracing::debug!(existing, "carrier directory already populated");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let mut inserted = 0;
    for carrier in seeds {
        match store.insert(carrier).await {
            Ok(stored) => {
                tracing::info!(carrier = %stored.code, "seeded carrier");
                inserted += 1;
            }
            Err(CarrierStoreError::NotMigrated) => return Ok(SeedOutcome::NotMigrated),
            // Another instance seeded the same empty directory first.
            Err(CarrierStoreError::DuplicateCode(code)) => {
                tracing::info!(carrier = %code, inserted, "carrier already seeded elsewhere");
                return Ok(SeedOutcome::AlreadyPopulated);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(SeedOutcome::Seeded(inserted))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{Carrier, InMemoryCarrierStore};

    /// Reports an empty directory regardless of its contents, like an
    /// instance that counted before a concurrent seed landed.
    struct StaleCount(InMemoryCarrierStore);

    #[async_trait]
    impl CarrierStore for StaleCount {
        async fn list(&self) -> Result<Vec<Carrier>> {
            self.0.list().await
        }

        async fn list_enabled(&self) -> Result<Vec<Carrier>> {
            self.0.list_enabled().await
        }

        async fn insert(&self, carrier: NewCarrier) -> Result<Carrier> {
            self.0.insert(carrier).await
        }

        async fn count(&self) -> Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn default_carriers_point_at_mock_endpoints() {
        let carriers = default_carriers("http://127.0.0.1:3000/");

        assert_eq!(carriers.len(), 2);
        assert_eq!(carriers[0].code().as_str(), "fedex");
        assert_eq!(
            carriers[0].api_endpoint_url,
            "http://127.0.0.1:3000/mock/fedex/shippingcost"
        );
        assert_eq!(carriers[1].shipment_methods["express"], "upsexp");
        assert!(carriers.iter().all(|c| c.enabled));
    }

    #[tokio::test]
    async fn bootstrap_seeds_empty_store() {
        let store = InMemoryCarrierStore::new();

        let outcome = bootstrap(&store, default_carriers("http://localhost"))
            .await
            .unwrap();

        assert_eq!(outcome, SeedOutcome::Seeded(2));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn repeated_bootstrap_never_duplicates() {
        let store = InMemoryCarrierStore::new();

        for _ in 0..3 {
            bootstrap(&store, default_carriers("http://localhost"))
                .await
                .unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(
            bootstrap(&store, default_carriers("http://localhost"))
                .await
                .unwrap(),
            SeedOutcome::AlreadyPopulated
        );
    }

    #[tokio::test]
    async fn bootstrap_skips_unmigrated_store() {
        let store = InMemoryCarrierStore::new();
        store.set_unmigrated(true).await;

        let outcome = bootstrap(&store, default_carriers("http://localhost"))
            .await
            .unwrap();

        assert_eq!(outcome, SeedOutcome::NotMigrated);
    }

    #[tokio::test]
    async fn bootstrap_losing_a_seed_race_reports_populated() {
        let inner = InMemoryCarrierStore::new();
        bootstrap(&inner, default_carriers("http://localhost"))
            .await
            .unwrap();
        let store = StaleCount(inner);

        let outcome = bootstrap(&store, default_carriers("http://localhost"))
            .await
            .unwrap();

        assert_eq!(outcome, SeedOutcome::AlreadyPopulated);
        assert_eq!(store.0.count().await.unwrap(), 2);
    }
}
