//! Mode-to-backend dispatch and result unification.
//!
//! The dispatcher is the sole entry point the UI layer calls. It maps a
//! `Mode` to its registered backend through a lookup table, and converts
//! every outcome — success from any backend, failure from any stage of
//! any backend — into the single `PredictionResult` shape. Nothing
//! panics or propagates a Rust error past this boundary.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use crate::backends::local::LocalGraphBackend;
use crate::backends::remote::RemoteBackend;
use crate::backends::InferenceBackend;
use crate::config::AppConfig;
use crate::model::{HttpArtifactFetcher, ModelHandle};
use crate::scaler::ScalerTable;
use crate::types::{FeatureVector, Mode, PredictError, PredictionResult, RawFeatureForm};

/// Routes prediction requests to backend strategies.
pub struct Dispatcher {
    backends: HashMap<Mode, Box<dyn InferenceBackend>>,
}

impl Dispatcher {
    /// An empty dispatcher. Every mode must be registered explicitly;
    /// an unregistered mode is a configuration error at request time.
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Register (or replace) the backend for a mode.
    pub fn register(&mut self, mode: Mode, backend: Box<dyn InferenceBackend>) {
        self.backends.insert(mode, backend);
    }

    /// Build the production dispatcher: two remote deployments sharing
    /// one HTTP client, plus the local graph-model pipeline.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(cfg.client.timeout())
            .user_agent(cfg.client.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for prediction backends")?;

        let mut dispatcher = Self::new();
        dispatcher.register(
            Mode::HardCode,
            Box::new(RemoteBackend::new(
                Mode::HardCode.as_str(),
                cfg.backends.hard_code_url.clone(),
                http.clone(),
            )),
        );
        dispatcher.register(
            Mode::TfServing,
            Box::new(RemoteBackend::new(
                Mode::TfServing.as_str(),
                cfg.backends.tf_serving_url.clone(),
                http.clone(),
            )),
        );
        dispatcher.register(
            Mode::TfJs,
            Box::new(LocalGraphBackend::new(
                ScalerTable::default(),
                ModelHandle::new(
                    cfg.model.artifact_url.clone(),
                    Arc::new(HttpArtifactFetcher::with_client(http)),
                ),
            )),
        );
        Ok(dispatcher)
    }

    /// Whether a backend is registered for `mode`.
    pub fn supports(&self, mode: Mode) -> bool {
        self.backends.contains_key(&mode)
    }

    /// Run one prediction through the backend registered for `mode`.
    ///
    /// Always resolves to exactly one of `Ok { price }` or
    /// `Err { reason }`; a new result fully replaces any previous one.
    pub async fn predict(&self, mode: Mode, features: &FeatureVector) -> PredictionResult {
        let backend = match self.backends.get(&mode) {
            Some(backend) => backend,
            None => {
                warn!(mode = %mode, "No backend registered for mode");
                return PredictionResult::from(Err(PredictError::UnknownMode(
                    mode.to_string(),
                )));
            }
        };

        info!(mode = %mode, backend = backend.name(), "Dispatching prediction");
        match backend.predict(features).await {
            Ok(price) => {
                info!(backend = backend.name(), price, "Prediction resolved");
                PredictionResult::Ok { price }
            }
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "Prediction failed");
                PredictionResult::Err {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// UI-boundary variant: parses the mode string and the raw form, so
    /// the caller never sees a Rust error type.
    pub async fn predict_form(&self, mode: &str, form: &RawFeatureForm) -> PredictionResult {
        let mode: Mode = match mode.parse() {
            Ok(mode) => mode,
            Err(e) => return PredictionResult::from(Err(e)),
        };
        let features = match FeatureVector::parse(form) {
            Ok(features) => features,
            Err(e) => return PredictionResult::from(Err(e)),
        };
        self.predict(mode, &features).await
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
