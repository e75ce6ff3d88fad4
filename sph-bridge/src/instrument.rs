//! Instrument REST client
//!
//! One GET per sample-ready notification, no retries.

use crate::event::SamplePayload;
use sph_common::config::InstrumentConfig;
use sph_common::{Error, Result};
use tracing::debug;

const USER_AGENT: &str = concat!("sph-bridge/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the instrument's current-sample endpoint
#[derive(Debug, Clone)]
pub struct InstrumentClient {
    http_client: reqwest::Client,
    sample_url: String,
}

impl InstrumentClient {
    pub fn new(config: &InstrumentConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Instrument(e.to_string()))?;

        Ok(Self {
            http_client,
            sample_url: config.sample_url()?,
        })
    }

    pub fn sample_url(&self) -> &str {
        &self.sample_url
    }

    /// Fetch the sample the instrument just announced
    pub async fn fetch_sample(&self) -> Result<SamplePayload> {
        debug!(url = %self.sample_url, "Fetching sample from instrument");

        let response = self
            .http_client
            .get(&self.sample_url)
            .send()
            .await
            .map_err(|e| Error::Instrument(format!("GET {} failed: {}", self.sample_url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Instrument(format!("Failed to read sample body: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Instrument(format!(
                "GET {} returned {}: {}",
                self.sample_url,
                status.as_u16(),
                body
            )));
        }

        debug!(body = %body, "Sample payload received");

        serde_json::from_str(&body)
            .map_err(|e| Error::Instrument(format!("Invalid sample payload: {}", e)))
    }
}
