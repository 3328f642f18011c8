//! Remote prediction endpoints.
//!
//! The hard-code and TF Serving deployments expose the same contract —
//! POST the raw feature vector as JSON, receive `{"price": <number>}` —
//! and differ only by path, so one client type covers both.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::InferenceBackend;
use crate::types::{FeatureVector, PredictError};

/// Expected response body from both remote deployments.
#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: f64,
}

/// Client for one remote prediction endpoint.
pub struct RemoteBackend {
    http: Client,
    endpoint: String,
    name: String,
}

impl RemoteBackend {
    /// `name` identifies the deployment in logs and error reasons;
    /// `endpoint` is the full POST URL.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            name: name.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceBackend for RemoteBackend {
    /// Submit the raw (unnormalized) features; the server owns scaling.
    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        debug!(backend = %self.name, endpoint = %self.endpoint, "Submitting remote prediction");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .map_err(|e| {
                PredictError::Transport(format!("{} request failed: {e}", self.name))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(backend = %self.name, status = %status, "Remote prediction rejected");
            return Err(PredictError::Transport(format!(
                "{} returned {status}: {body}",
                self.name
            )));
        }

        let parsed: PriceResponse = resp.json().await.map_err(|e| {
            PredictError::ResponseParse(format!(
                "{} response missing a numeric price: {e}",
                self.name
            ))
        })?;

        if !parsed.price.is_finite() {
            return Err(PredictError::ResponseParse(format!(
                "{} returned a non-finite price",
                self.name
            )));
        }

        debug!(backend = %self.name, price = parsed.price, "Remote prediction resolved");
        Ok(parsed.price)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
