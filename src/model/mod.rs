//! Remote model artifact loading and caching.
//!
//! A `ModelHandle` owns the lazily-loaded model for one artifact URL.
//! The first `model()` call fetches and parses the artifact; concurrent
//! callers during that load await the same in-flight operation instead
//! of issuing duplicate fetches (single-flight, via `tokio::sync::OnceCell`).
//! A successful load is cached for the life of the handle; a failed load
//! is not cached, so the next call retries.

pub mod graph;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::types::PredictError;
use graph::GraphModel;

/// Abstraction over artifact retrieval, so tests can count fetches and
/// serve canned documents without a network.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Retrieve the artifact document at `url`.
    async fn fetch(&self, url: &str) -> Result<String, PredictError>;
}

/// Production fetcher: a GET through the shared HTTP client.
pub struct HttpArtifactFetcher {
    http: Client,
}

impl HttpArtifactFetcher {
    /// Build a fetcher with its own HTTP client.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client for artifact fetching")?;
        Ok(Self { http })
    }

    /// Build a fetcher around an existing client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PredictError> {
        debug!(url = %url, "Fetching model artifact");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PredictError::ModelLoad(format!("artifact request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(PredictError::ModelLoad(format!(
                "artifact fetch returned {status} for {url}"
            )));
        }

        resp.text()
            .await
            .map_err(|e| PredictError::ModelLoad(format!("failed to read artifact body: {e}")))
    }
}

/// Lazily-loaded, cached reference to a remote graph-model artifact.
pub struct ModelHandle {
    url: String,
    fetcher: Arc<dyn ArtifactFetcher>,
    model: OnceCell<Arc<GraphModel>>,
}

impl ModelHandle {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self {
            url: url.into(),
            fetcher,
            model: OnceCell::new(),
        }
    }

    /// The artifact URL this handle loads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a load has already completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Get the loaded model, fetching and parsing the artifact on first use.
    ///
    /// Safe under concurrent invocation: the first caller initiates the
    /// load and every concurrent caller awaits that same load.
    pub async fn model(&self) -> Result<Arc<GraphModel>, PredictError> {
        self.model
            .get_or_try_init(|| async {
                info!(url = %self.url, "Loading model artifact");
                let body = self.fetcher.fetch(&self.url).await?;
                let model = GraphModel::from_json(&body)?;
                debug!(
                    url = %self.url,
                    input_width = model.input_width(),
                    output_width = model.output_width(),
                    "Model artifact loaded"
                );
                Ok(Arc::new(model))
            })
            .await
            .cloned()
    }

    /// Drop the cached model so the next `model()` call fetches afresh.
    /// Takes `&mut self`, so no prediction can hold the old model through
    /// the reload.
    pub fn reload(&mut self) {
        self.model = OnceCell::new();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
