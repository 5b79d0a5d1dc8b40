//! HTTP access to carrier cost endpoints.

use std::time::Duration;

use async_trait::async_trait;
use carrier_store::Carrier;
use reqwest::Client;
use thiserror::Error;

use crate::request::QuoteRequest;

/// Raw answer from a carrier endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body, `None` if the body was empty or not JSON.
    pub body: Option<serde_json::Value>,
}

impl CarrierResponse {
    pub fn new(status: u16, body: Option<serde_json::Value>) -> Self {
        Self { status, body }
    }
}

/// A carrier call that produced no HTTP response at all.
#[derive(Debug, Error)]
pub enum CarrierCallError {
    /// The carrier did not answer within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection or protocol failure.
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The HTTP client could not be created.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Trait for calling one carrier's cost endpoint.
#[async_trait]
pub trait CarrierClient: Send + Sync {
    /// Sends the quote request to the carrier and returns its raw response.
    async fn request_cost(
        &self,
        carrier: &Carrier,
        request: &QuoteRequest,
    ) -> Result<CarrierResponse, CarrierCallError>;
}

/// `reqwest`-backed carrier client with a per-call timeout.
///
/// Credentials are sent as an `x-app-id` header and a bearer token.
#[derive(Debug, Clone)]
pub struct HttpCarrierClient {
    client: Client,
}

impl HttpCarrierClient {
    /// Creates a client whose calls time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, CarrierCallError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CarrierCallError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CarrierClient for HttpCarrierClient {
    async fn request_cost(
        &self,
        carrier: &Carrier,
        request: &QuoteRequest,
    ) -> Result<CarrierResponse, CarrierCallError> {
        let url = carrier.api_endpoint_url.as_str();

        let mut builder = self.client.post(url).json(request);
        if !carrier.app_id.is_empty() {
            builder = builder.header("x-app-id", &carrier.app_id);
        }
        if !carrier.app_token.is_empty() {
            builder = builder.bearer_auth(&carrier.app_token);
        }

        let response = builder.send().await.map_err(|e| map_reqwest_error(url, e))?;
        let status = response.status().as_u16();
        // Timeouts also apply while the body is streamed.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;
        let body = serde_json::from_slice(&bytes).ok();

        Ok(CarrierResponse { status, body })
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> CarrierCallError {
    if err.is_timeout() {
        CarrierCallError::Timeout {
            url: url.to_string(),
        }
    } else {
        CarrierCallError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
