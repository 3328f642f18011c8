//! Model input tensors.
//!
//! The graph model consumes an `ndarray` matrix with a logical
//! `[rows, 4]` shape. The UI only ever submits one row, but batching is
//! supported by stacking rows in submission order. Column order is
//! fixed by the scaler table (see `scaler`).

use ndarray::Array2;

use crate::scaler::NormalizedVector;
use crate::types::{Feature, PredictError};

/// Number of columns in every input row.
pub const FEATURE_WIDTH: usize = Feature::ORDER.len();

/// A `[rows, cols]` matrix of model inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array2<f32>,
}

impl Tensor {
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// The underlying matrix. Row and element access go through
    /// `ndarray`'s own (documented) indexing semantics.
    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }
}

/// Builds model input tensors from normalized feature vectors.
pub struct TensorBuilder;

impl TensorBuilder {
    /// Build a `[1, 4]` tensor for a single prediction.
    pub fn build_one(row: &NormalizedVector) -> Tensor {
        let values = row.values();
        Tensor {
            data: Array2::from_shape_fn((1, FEATURE_WIDTH), |(_, j)| values[j] as f32),
        }
    }

    /// Build a `[rows, 4]` tensor from a batch, stacking rows in
    /// submission order. An empty batch has no meaningful shape.
    pub fn build(rows: &[NormalizedVector]) -> Result<Tensor, PredictError> {
        if rows.is_empty() {
            return Err(PredictError::ShapeMismatch(
                "cannot build a tensor from an empty batch".to_string(),
            ));
        }
        Ok(Tensor {
            data: Array2::from_shape_fn((rows.len(), FEATURE_WIDTH), |(i, j)| {
                rows[i].values()[j] as f32
            }),
        })
    }

    /// Build a tensor directly from raw `f32` rows. Used by model tests;
    /// production code always goes through `NormalizedVector`.
    #[cfg(test)]
    pub fn from_rows(rows: &[[f32; FEATURE_WIDTH]]) -> Tensor {
        Tensor {
            data: ndarray::arr2(rows),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
