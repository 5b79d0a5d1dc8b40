use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{CarrierCode, CarrierStoreError, Result};

/// A stored carrier record.
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    /// Surrogate key assigned by the store.
    pub id: i64,
    /// Normalized code derived from `name`.
    pub code: CarrierCode,
    /// Display name.
    pub name: String,
    /// Application id issued by the carrier.
    pub app_id: String,
    /// Application token issued by the carrier.
    pub app_token: String,
    /// Shipment method label (e.g. `"express"`) to carrier-specific code.
    pub shipment_methods: BTreeMap<String, String>,
    /// Disabled carriers are listed but never quoted.
    pub enabled: bool,
    /// Absolute URL of the carrier's shipping cost endpoint.
    pub api_endpoint_url: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A carrier that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarrier {
    pub name: String,
    pub app_id: String,
    pub app_token: String,
    pub shipment_methods: BTreeMap<String, String>,
    pub enabled: bool,
    pub api_endpoint_url: String,
}

impl NewCarrier {
    /// Creates an enabled carrier with no credentials or shipment methods.
    pub fn new(name: impl Into<String>, api_endpoint_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            app_id: String::new(),
            app_token: String::new(),
            shipment_methods: BTreeMap::new(),
            enabled: true,
            api_endpoint_url: api_endpoint_url.into(),
        }
    }

    /// Sets the credentials issued by the carrier.
    pub fn credentials(mut self, app_id: impl Into<String>, app_token: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self.app_token = app_token.into();
        self
    }

    /// Adds a shipment method, replacing any previous code for the label.
    pub fn shipment_method(mut self, label: impl Into<String>, code: impl Into<String>) -> Self {
        self.shipment_methods.insert(label.into(), code.into());
        self
    }

    /// Sets the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the code this carrier will be stored under.
    pub fn code(&self) -> CarrierCode {
        CarrierCode::from_name(&self.name)
    }

    /// Checks the record before it reaches a backend.
    pub(crate) fn validate(&self) -> Result<CarrierCode> {
        let code = self.code();
        if code.is_empty() {
            return Err(CarrierStoreError::InvalidCarrier(
                "name must not be blank".to_string(),
            ));
        }
        if self.api_endpoint_url.trim().is_empty() {
            return Err(CarrierStoreError::InvalidCarrier(format!(
                "carrier {code} has no endpoint"
            )));
        }
        Ok(code)
    }

    /// Materializes the record with store-assigned fields.
    pub(crate) fn into_carrier(self, id: i64, code: CarrierCode, now: DateTime<Utc>) -> Carrier {
        Carrier {
            id,
            code,
            name: self.name,
            app_id: self.app_id,
            app_token: self.app_token,
            shipment_methods: self.shipment_methods,
            enabled: self.enabled,
            api_endpoint_url: self.api_endpoint_url,
            created_at: now,
            modified_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_methods_and_credentials() {
        let carrier = NewCarrier::new(" DHL ", "http://localhost/mock/dhl/shippingcost")
            .credentials("DHLID", "DHLTKN")
            .shipment_method("cheap", "dhlchp")
            .shipment_method("express", "dhlexp");

        assert_eq!(carrier.code().as_str(), "dhl");
        assert_eq!(carrier.app_id, "DHLID");
        assert_eq!(carrier.shipment_methods.len(), 2);
        assert!(carrier.enabled);
    }

    #[test]
    fn blank_name_is_rejected() {
        let carrier = NewCarrier::new("   ", "http://localhost/mock/x/shippingcost");
        assert!(matches!(
            carrier.validate(),
            Err(CarrierStoreError::InvalidCarrier(_))
        ));
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let carrier = NewCarrier::new("Fedex", "");
        assert!(carrier.validate().is_err());
    }
}
