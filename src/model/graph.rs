//! Dense graph-model artifact format and executor.
//!
//! The remote artifact is a single JSON document describing a stack of
//! dense layers — topology and weights together, so one GET fetches the
//! whole model. Layer dimensions are validated at load time; a shape
//! problem found then is a `ModelLoad` error, while a shape problem
//! between a request tensor and a well-formed model is `ShapeMismatch`.

use ndarray::{Array1, Array2};
use serde::Deserialize;

use crate::tensor::Tensor;
use crate::types::PredictError;

/// The only artifact format this loader understands.
pub const ARTIFACT_FORMAT: &str = "dense-graph/1";

// ---------------------------------------------------------------------------
// Artifact schema (JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ArtifactDoc {
    format: String,
    input_width: usize,
    layers: Vec<LayerDoc>,
}

#[derive(Debug, Deserialize)]
struct LayerDoc {
    units: usize,
    activation: Activation,
    /// One row per input of the layer, `units` columns per row.
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Activation {
    Linear,
    Relu,
    Sigmoid,
}

impl Activation {
    fn apply(&self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

// ---------------------------------------------------------------------------
// Executable model
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct DenseLayer {
    /// `input_width × units`.
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

impl DenseLayer {
    fn forward(&self, input: &Array2<f32>) -> Array2<f32> {
        let mut out = input.dot(&self.weights) + &self.bias;
        out.mapv_inplace(|x| self.activation.apply(x));
        out
    }
}

/// A loaded, validated graph model ready to run.
#[derive(Debug)]
pub struct GraphModel {
    input_width: usize,
    layers: Vec<DenseLayer>,
    output_width: usize,
}

impl GraphModel {
    /// Parse and validate an artifact document.
    ///
    /// Any structural problem — wrong format tag, layer dimension
    /// inconsistencies, zero layers — is a `ModelLoad` error.
    pub fn from_json(body: &str) -> Result<Self, PredictError> {
        let doc: ArtifactDoc = serde_json::from_str(body)
            .map_err(|e| PredictError::ModelLoad(format!("malformed artifact: {e}")))?;

        if doc.format != ARTIFACT_FORMAT {
            return Err(PredictError::ModelLoad(format!(
                "unsupported artifact format {:?}, expected {ARTIFACT_FORMAT:?}",
                doc.format
            )));
        }
        if doc.input_width == 0 {
            return Err(PredictError::ModelLoad(
                "artifact declares zero input width".to_string(),
            ));
        }
        if doc.layers.is_empty() {
            return Err(PredictError::ModelLoad(
                "artifact contains no layers".to_string(),
            ));
        }

        let mut layers = Vec::with_capacity(doc.layers.len());
        let mut width = doc.input_width;
        for (index, layer) in doc.layers.into_iter().enumerate() {
            if layer.units == 0 {
                return Err(PredictError::ModelLoad(format!(
                    "layer {index} has zero units"
                )));
            }
            if layer.weights.len() != width {
                return Err(PredictError::ModelLoad(format!(
                    "layer {index} expects {width} weight rows, artifact has {}",
                    layer.weights.len()
                )));
            }
            if layer.bias.len() != layer.units {
                return Err(PredictError::ModelLoad(format!(
                    "layer {index} has {} bias values for {} units",
                    layer.bias.len(),
                    layer.units
                )));
            }
            let mut flat = Vec::with_capacity(width * layer.units);
            for (row_index, row) in layer.weights.iter().enumerate() {
                if row.len() != layer.units {
                    return Err(PredictError::ModelLoad(format!(
                        "layer {index} weight row {row_index} has {} columns for {} units",
                        row.len(),
                        layer.units
                    )));
                }
                flat.extend_from_slice(row);
            }
            let weights = Array2::from_shape_vec((width, layer.units), flat)
                .map_err(|e| PredictError::ModelLoad(format!("layer {index}: {e}")))?;
            layers.push(DenseLayer {
                weights,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
            width = layer.units;
        }

        Ok(GraphModel {
            input_width: doc.input_width,
            layers,
            output_width: width,
        })
    }

    /// Number of columns an input tensor must have.
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Number of values produced per input row.
    pub fn output_width(&self) -> usize {
        self.output_width
    }

    /// Run the forward pass over every row of the input tensor.
    ///
    /// Returns a row-major buffer of `rows × output_width` values.
    pub fn run(&self, input: &Tensor) -> Result<Vec<f32>, PredictError> {
        if input.cols() != self.input_width {
            return Err(PredictError::ShapeMismatch(format!(
                "model expects [-1, {}] input, got [{}, {}]",
                self.input_width,
                input.rows(),
                input.cols()
            )));
        }

        let mut current = input.as_array().to_owned();
        for layer in &self.layers {
            current = layer.forward(&current);
        }

        for (row_index, row) in current.rows().into_iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(PredictError::Inference(format!(
                    "model produced a non-finite value for row {row_index}"
                )));
            }
        }
        Ok(current.iter().copied().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
