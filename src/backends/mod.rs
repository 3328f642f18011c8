//! Prediction backends.
//!
//! Defines the `InferenceBackend` trait and provides implementations for:
//! - Remote endpoints — the hard-code and TF Serving deployments, both
//!   the same POST contract behind different paths
//! - Local graph-model inference — the tf-js mode, fully client-side
//!
//! Backends return a bare price or a typed `PredictError`; unification
//! into `PredictionResult` happens at the dispatcher boundary.

pub mod remote;
pub mod local;

use async_trait::async_trait;

use crate::types::{FeatureVector, PredictError};

/// Abstraction over prediction strategies.
///
/// Implementors turn a raw (unnormalized) feature vector into a price.
/// Long-running work is async; no implementor retries on its own —
/// a failed attempt is terminal for that request.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Produce a price for the given feature vector.
    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError>;

    /// Backend name for logging and identification.
    fn name(&self) -> &str;
}
