//! Client-side graph-model inference.
//!
//! Runs the full local pipeline: min/max normalization, `[1, 4]` tensor
//! build, lazy artifact load, forward pass, first-scalar extraction.
//! A failure at any stage aborts the whole prediction; partial results
//! are never surfaced.

use async_trait::async_trait;
use tracing::debug;

use super::InferenceBackend;
use crate::model::ModelHandle;
use crate::scaler::ScalerTable;
use crate::tensor::TensorBuilder;
use crate::types::{FeatureVector, PredictError};

const BACKEND_NAME: &str = "tf-js";

/// Backend that evaluates the graph model in-process.
pub struct LocalGraphBackend {
    scaler: ScalerTable,
    handle: ModelHandle,
}

impl LocalGraphBackend {
    pub fn new(scaler: ScalerTable, handle: ModelHandle) -> Self {
        Self { scaler, handle }
    }

    /// Handle access for cache inspection and explicit reload.
    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut ModelHandle {
        &mut self.handle
    }
}

#[async_trait]
impl InferenceBackend for LocalGraphBackend {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let normalized = self.scaler.normalize(features);
        let tensor = TensorBuilder::build_one(&normalized);

        let model = self.handle.model().await?;
        let output = model.run(&tensor)?;

        // One input row; the price is the first scalar of the output.
        let price = output.first().copied().ok_or_else(|| {
            PredictError::Inference("model produced an empty output sequence".to_string())
        })?;

        debug!(backend = BACKEND_NAME, price, "Local inference complete");
        Ok(f64::from(price))
    }

    fn name(&self) -> &str {
        BACKEND_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
