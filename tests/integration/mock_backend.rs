//! Mock backend and artifact fetcher for integration testing.
//!
//! Provides deterministic `InferenceBackend` and `ArtifactFetcher`
//! implementations that return known values, count invocations, and
//! can be forced into failure — all in-memory with no external
//! dependencies.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use housecast::backends::InferenceBackend;
use housecast::model::graph::ARTIFACT_FORMAT;
use housecast::model::ArtifactFetcher;
use housecast::types::{FeatureVector, PredictError};

/// A mock backend with a fixed price and a switchable failure mode.
pub struct MockBackend {
    name: String,
    price: f64,
    calls: AtomicUsize,
    /// If set, `predict` returns this as a transport error.
    force_error: Mutex<Option<String>>,
}

impl MockBackend {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            calls: AtomicUsize::new(0),
            force_error: Mutex::new(None),
        }
    }

    /// Force all subsequent predictions to fail.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn predict(&self, _features: &FeatureVector) -> Result<f64, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = self.force_error.lock().unwrap().as_ref() {
            return Err(PredictError::Transport(msg.clone()));
        }
        Ok(self.price)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Delegate so tests can keep a shared handle to a registered mock and
/// flip its failure mode mid-test. (A newtype because the orphan rule
/// forbids implementing the crate's trait directly for `Arc<MockBackend>`.)
pub struct SharedMock(pub std::sync::Arc<MockBackend>);

#[async_trait]
impl InferenceBackend for SharedMock {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        self.0.as_ref().predict(features).await
    }

    fn name(&self) -> &str {
        self.0.as_ref().name()
    }
}

/// Artifact fetcher that serves a canned document and counts fetches.
pub struct CountingFetcher {
    body: String,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers overlap with the in-flight load.
        tokio::task::yield_now().await;
        Ok(self.body.clone())
    }
}

/// A valid 4→1 linear artifact: price = sum(normalized) * 100000 + 50000.
pub fn linear_artifact() -> String {
    serde_json::json!({
        "format": ARTIFACT_FORMAT,
        "input_width": 4,
        "layers": [{
            "units": 1,
            "activation": "linear",
            "weights": [[100000.0], [100000.0], [100000.0], [100000.0]],
            "bias": [50000.0]
        }]
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fixed_price() {
        let backend = MockBackend::new("mock", 123400.0);
        let price = backend.predict(&sample()).await.unwrap();
        assert_eq!(price, 123400.0);
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_forced_error_and_clear() {
        let backend = MockBackend::new("mock", 1.0);
        backend.set_error("simulated outage");

        let err = backend.predict(&sample()).await.unwrap_err();
        assert!(err.to_string().contains("simulated outage"));

        backend.clear_error();
        assert!(backend.predict(&sample()).await.is_ok());
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_counting_fetcher() {
        let fetcher = CountingFetcher::new(&linear_artifact());
        assert_eq!(fetcher.fetch_count(), 0);
        let body = fetcher.fetch("mock://model.json").await.unwrap();
        assert!(body.contains("dense-graph"));
        assert_eq!(fetcher.fetch_count(), 1);
    }

    fn sample() -> FeatureVector {
        FeatureVector::new(25.0, 2500.0, 500.0, 1200.0).unwrap()
    }
}
