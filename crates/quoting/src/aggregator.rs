//! Multi-carrier cost aggregation.

use std::time::Instant;

use carrier_store::{Carrier, CarrierStore};

use crate::client::{CarrierCallError, CarrierClient, CarrierResponse};
use crate::error::QuotingError;
use crate::request::{CostQuote, QuoteRequest};

/// Message for responses that do not match the carrier contract.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error while requesting a quote";

/// How a single carrier call ended, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Quoted,
    CarrierFailed,
    Unexpected,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Quoted => "quoted",
            Outcome::CarrierFailed => "carrier_failed",
            Outcome::Unexpected => "unexpected",
        }
    }
}

fn carrier_failed_message(carrier: &Carrier) -> String {
    format!("Carrier {} could not provide a quote", carrier.name)
}

fn classify(
    carrier: &Carrier,
    outcome: Result<CarrierResponse, CarrierCallError>,
) -> (CostQuote, Outcome) {
    let code = carrier.code.clone();

    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(carrier = %code, error = %err, "carrier call failed");
            return (
                CostQuote::failure(code, carrier_failed_message(carrier)),
                Outcome::CarrierFailed,
            );
        }
    };

    match response.status {
        200 => match response
            .body
            .as_ref()
            .and_then(|body| body.get("cost"))
            .and_then(serde_json::Value::as_i64)
        {
            Some(cost) => (CostQuote::success(code, cost), Outcome::Quoted),
            None => (
                CostQuote::failure(code, UNEXPECTED_ERROR_MESSAGE),
                Outcome::Unexpected,
            ),
        },
        404 | 500..=599 => (
            CostQuote::failure(code, carrier_failed_message(carrier)),
            Outcome::CarrierFailed,
        ),
        _ => (
            CostQuote::failure(code, UNEXPECTED_ERROR_MESSAGE),
            Outcome::Unexpected,
        ),
    }
}

/// Maps a raw carrier outcome to the record returned to clients.
///
/// - 200 with an integer `cost`: the cost, no error
/// - 404, any 5xx, or no response at all: an error naming the carrier
/// - anything else: a generic error
pub fn interpret_response(
    carrier: &Carrier,
    outcome: Result<CarrierResponse, CarrierCallError>,
) -> CostQuote {
    classify(carrier, outcome).0
}

/// Queries every enabled carrier for a cost.
///
/// Carriers are called one after another in directory order and each call
/// waits for the previous one. A failing carrier becomes an error record;
/// it never aborts the aggregation and is never retried.
pub struct CostAggregator<S, C>
where
    S: CarrierStore,
    C: CarrierClient,
{
    store: S,
    client: C,
}

impl<S, C> CostAggregator<S, C>
where
    S: CarrierStore,
    C: CarrierClient,
{
    /// Creates a new aggregator.
    pub fn new(store: S, client: C) -> Self {
        Self { store, client }
    }

    /// Returns one quote per enabled carrier, in directory order.
    #[tracing::instrument(skip(self, request), fields(test_mode = request.test_mode))]
    pub async fn quote(&self, request: QuoteRequest) -> Result<Vec<CostQuote>, QuotingError> {
        let carriers = self.store.list_enabled().await?;
        let mut quotes = Vec::with_capacity(carriers.len());

        for carrier in &carriers {
            let started = Instant::now();
            let outcome = self.client.request_cost(carrier, &request).await;
            let elapsed = started.elapsed().as_secs_f64();

            let status = outcome.as_ref().map(|r| r.status).ok();
            let (quote, kind) = classify(carrier, outcome);

            metrics::counter!(
                "carrier_quotes_total",
                "carrier" => carrier.code.to_string(),
                "outcome" => kind.as_str()
            )
            .increment(1);
            metrics::histogram!("carrier_quote_duration_seconds", "carrier" => carrier.code.to_string())
                .record(elapsed);
            tracing::info!(
                carrier = %carrier.code,
                ?status,
                outcome = kind.as_str(),
                elapsed,
                "carrier quote received"
            );

            quotes.push(quote);
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use carrier_store::{CarrierStoreError, InMemoryCarrierStore, NewCarrier};
    use common::{BoxType, Priority};
    use serde_json::json;

    use super::*;

    /// Replies from a fixed table keyed by carrier code and records call order.
    #[derive(Clone, Default)]
    struct ScriptedClient {
        replies: Arc<HashMap<String, Option<CarrierResponse>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<(&str, Option<CarrierResponse>)>) -> Self {
            Self {
                replies: Arc::new(
                    replies
                        .into_iter()
                        .map(|(code, reply)| (code.to_string(), reply))
                        .collect(),
                ),
                calls: Arc::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CarrierClient for ScriptedClient {
        async fn request_cost(
            &self,
            carrier: &Carrier,
            _request: &QuoteRequest,
        ) -> Result<CarrierResponse, CarrierCallError> {
            self.calls.lock().unwrap().push(carrier.code.to_string());
            match self.replies.get(carrier.code.as_str()).cloned().flatten() {
                Some(response) => Ok(response),
                None => Err(CarrierCallError::Timeout {
                    url: carrier.api_endpoint_url.clone(),
                }),
            }
        }
    }

    fn request() -> QuoteRequest {
        QuoteRequest {
            address: "123 Fake St".to_string(),
            weight: 33,
            priority: Priority::HIGHEST,
            box_type: BoxType::Medium,
            test_mode: true,
        }
    }

    async fn store_with(names: &[&str]) -> InMemoryCarrierStore {
        let store = InMemoryCarrierStore::new();
        for name in names {
            store
                .insert(NewCarrier::new(*name, format!("http://carrier.test/{name}")))
                .await
                .unwrap();
        }
        store
    }

    fn carrier(name: &str) -> Carrier {
        let now = chrono::Utc::now();
        Carrier {
            id: 1,
            code: name.into(),
            name: name.to_string(),
            app_id: String::new(),
            app_token: String::new(),
            shipment_methods: Default::default(),
            enabled: true,
            api_endpoint_url: "http://carrier.test".to_string(),
            created_at: now,
            modified_at: now,
        }
    }

    fn ok(cost: i64) -> Option<CarrierResponse> {
        Some(CarrierResponse::new(200, Some(json!({ "cost": cost }))))
    }

    #[tokio::test]
    async fn quotes_every_enabled_carrier_in_order() {
        let store = store_with(&["UPS", "Fedex", "DHL"]).await;
        store.set_enabled(&"fedex".into(), false).await;
        let client = ScriptedClient::new(vec![("ups", ok(12)), ("dhl", ok(40))]);
        let aggregator = CostAggregator::new(store, client.clone());

        let quotes = aggregator.quote(request()).await.unwrap();

        assert_eq!(
            quotes,
            vec![
                CostQuote::success("ups".into(), 12),
                CostQuote::success("dhl".into(), 40),
            ]
        );
        assert_eq!(client.calls(), vec!["ups", "dhl"]);
    }

    #[tokio::test]
    async fn failing_carrier_does_not_abort_others() {
        let store = store_with(&["Fedex", "UPS"]).await;
        let client = ScriptedClient::new(vec![
            ("fedex", Some(CarrierResponse::new(500, None))),
            ("ups", ok(42)),
        ]);
        let aggregator = CostAggregator::new(store, client);

        let quotes = aggregator.quote(request()).await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert!(quotes[0].error.contains("Fedex"));
        assert_eq!(quotes[0].cost, CostQuote::UNAVAILABLE);
        assert_eq!(quotes[1], CostQuote::success("ups".into(), 42));
    }

    #[tokio::test]
    async fn empty_directory_yields_empty_quote_list() {
        let aggregator = CostAggregator::new(InMemoryCarrierStore::new(), ScriptedClient::default());
        assert!(aggregator.quote(request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn directory_failure_is_a_top_level_error() {
        let store = InMemoryCarrierStore::new();
        store.set_unmigrated(true).await;
        let aggregator = CostAggregator::new(store, ScriptedClient::default());

        let err = aggregator.quote(request()).await.unwrap_err();
        assert!(matches!(
            err,
            QuotingError::Store(CarrierStoreError::NotMigrated)
        ));
    }

    #[test]
    fn success_uses_body_cost() {
        let quote = interpret_response(&carrier("UPS"), Ok(ok(42).unwrap()));
        assert_eq!(quote.error, "");
        assert_eq!(quote.cost, 42);
    }

    #[test]
    fn not_found_and_server_errors_name_the_carrier() {
        for status in [404, 500, 502, 503, 599] {
            let quote =
                interpret_response(&carrier("UPS"), Ok(CarrierResponse::new(status, None)));
            assert_eq!(quote.error, "Carrier UPS could not provide a quote");
            assert_eq!(quote.cost, CostQuote::UNAVAILABLE);
        }
    }

    #[test]
    fn timeouts_name_the_carrier() {
        let quote = interpret_response(
            &carrier("Fedex"),
            Err(CarrierCallError::Timeout {
                url: "http://carrier.test".to_string(),
            }),
        );
        assert!(quote.error.contains("Fedex"));
        assert_eq!(quote.cost, CostQuote::UNAVAILABLE);
    }

    #[test]
    fn other_statuses_are_unexpected() {
        for status in [201, 301, 400, 401, 418] {
            let quote =
                interpret_response(&carrier("UPS"), Ok(CarrierResponse::new(status, None)));
            assert_eq!(quote.error, UNEXPECTED_ERROR_MESSAGE);
            assert_eq!(quote.cost, CostQuote::UNAVAILABLE);
        }
    }

    #[test]
    fn success_without_integer_cost_is_unexpected() {
        for body in [None, Some(json!({})), Some(json!({ "cost": "12" }))] {
            let quote = interpret_response(&carrier("UPS"), Ok(CarrierResponse::new(200, body)));
            assert_eq!(quote.error, UNEXPECTED_ERROR_MESSAGE);
            assert_eq!(quote.cost, CostQuote::UNAVAILABLE);
        }
    }
}
