//! Outbound HTTP for the Distance Matrix client

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use super::ApiError;

/// Fixed endpoint of the Distance Matrix JSON API
pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Upper bound on a single request, connect included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Performs the GET round trip and hands back the response body
///
/// The client is generic over this so tests can count and script calls without
/// a network.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, params: &[(&str, String)]) -> Result<String, ApiError>;
}

/// reqwest-backed transport hitting the real endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DISTANCE_MATRIX_URL)
    }

    /// Creates a transport pointing at another endpoint (proxies, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, params: &[(&str, String)]) -> Result<String, ApiError> {
        debug!(url = %self.base_url, "Sending Distance Matrix request");

        let response = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        debug!(status = %response.status(), "Distance Matrix response received");
        Ok(response.text().await?)
    }
}
