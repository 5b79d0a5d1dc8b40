use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{Carrier, CarrierCode, CarrierStore, CarrierStoreError, NewCarrier, Result};

#[derive(Debug, Default)]
struct InMemoryState {
    carriers: Vec<Carrier>,
    next_id: i64,
    unmigrated: bool,
}

/// In-memory carrier directory.
///
/// Provides the same interface and ordering as the PostgreSQL implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCarrierStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryCarrierStore {
    /// Creates a new empty in-memory carrier store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation behave as if the backing table were missing.
    pub async fn set_unmigrated(&self, unmigrated: bool) {
        self.state.write().await.unmigrated = unmigrated;
    }

    /// Toggles the enabled flag of a carrier. Returns false if the code is unknown.
    pub async fn set_enabled(&self, code: &CarrierCode, enabled: bool) -> bool {
        let mut state = self.state.write().await;
        match state.carriers.iter_mut().find(|c| &c.code == code) {
            Some(carrier) => {
                carrier.enabled = enabled;
                carrier.modified_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

fn ensure_migrated(state: &InMemoryState) -> Result<()> {
    if state.unmigrated {
        return Err(CarrierStoreError::NotMigrated);
    }
    Ok(())
}

#[async_trait]
impl CarrierStore for InMemoryCarrierStore {
    async fn list(&self) -> Result<Vec<Carrier>> {
        let state = self.state.read().await;
        ensure_migrated(&state)?;
        Ok(state.carriers.clone())
    }

    async fn list_enabled(&self) -> Result<Vec<Carrier>> {
        let state = self.state.read().await;
        ensure_migrated(&state)?;
        Ok(state
            .carriers
            .iter()
            .filter(|c| c.enabled)
            .cloned()
            .collect())
    }

    async fn insert(&self, carrier: NewCarrier) -> Result<Carrier> {
        let code = carrier.validate()?;

        let mut state = self.state.write().await;
        ensure_migrated(&state)?;

        if state.carriers.iter().any(|c| c.code == code) {
            return Err(CarrierStoreError::DuplicateCode(code));
        }

        state.next_id += 1;
        let stored = carrier.into_carrier(state.next_id, code, Utc::now());
        state.carriers.push(stored.clone());

        Ok(stored)
    }

    async fn count(&self) -> Result<u64> {
        let state = self.state.read().await;
        ensure_migrated(&state)?;
        Ok(state.carriers.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CarrierStoreExt;

    fn carrier(name: &str) -> NewCarrier {
        NewCarrier::new(name, format!("http://localhost/mock/{name}/shippingcost"))
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryCarrierStore::new();

        let first = store.insert(carrier("Fedex")).await.unwrap();
        let second = store.insert(carrier("UPS")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.code.as_str(), "ups");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = InMemoryCarrierStore::new();
        for name in ["UPS", "Fedex", "DHL"] {
            store.insert(carrier(name)).await.unwrap();
        }

        let codes: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code.to_string())
            .collect();
        assert_eq!(codes, vec!["ups", "fedex", "dhl"]);
    }

    #[tokio::test]
    async fn list_enabled_skips_disabled_carriers() {
        let store = InMemoryCarrierStore::new();
        store.insert(carrier("Fedex")).await.unwrap();
        store.insert(carrier("UPS").enabled(false)).await.unwrap();
        store.insert(carrier("DHL")).await.unwrap();

        let enabled = store.list_enabled().await.unwrap();
        assert_eq!(enabled.len(), 2);
        assert_eq!(enabled[0].code.as_str(), "fedex");
        assert_eq!(enabled[1].code.as_str(), "dhl");
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn codes_differing_by_case_and_whitespace_collide() {
        let store = InMemoryCarrierStore::new();
        store.insert(carrier("UPS")).await.unwrap();

        let err = store.insert(carrier("  ups")).await.unwrap_err();
        assert!(matches!(err, CarrierStoreError::DuplicateCode(code) if code.as_str() == "ups"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_enabled_toggles_flag() {
        let store = InMemoryCarrierStore::new();
        store.insert(carrier("Fedex")).await.unwrap();

        assert!(store.set_enabled(&"fedex".into(), false).await);
        assert!(store.list_enabled().await.unwrap().is_empty());
        assert!(!store.set_enabled(&"dhl".into(), false).await);
    }

    #[tokio::test]
    async fn unmigrated_store_reports_not_migrated() {
        let store = InMemoryCarrierStore::new();
        store.set_unmigrated(true).await;

        assert!(matches!(
            store.count().await,
            Err(CarrierStoreError::NotMigrated)
        ));
        assert!(matches!(
            store.insert(carrier("Fedex")).await,
            Err(CarrierStoreError::NotMigrated)
        ));
    }

    #[tokio::test]
    async fn find_by_code_uses_normalized_code() {
        let store = InMemoryCarrierStore::new();
        store.insert(carrier("Fedex")).await.unwrap();

        let found = store.find_by_code(&"FEDEX ".into()).await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Fedex".to_string()));
        assert!(store.find_by_code(&"dhl".into()).await.unwrap().is_none());
        assert!(!store.is_empty().await.unwrap());
    }
}
