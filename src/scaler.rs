//! Min/max feature scaling.
//!
//! The model was trained on features scaled to `[0, 1]` with the fixed
//! per-feature min/max table below. Normalization is purely linear and
//! never clamps: values outside the training range extrapolate below 0
//! or above 1, matching what the model saw at export time.

use crate::types::{Feature, FeatureVector, PredictError};

/// Training-set min/max for one feature. Invariant: `max > min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalerEntry {
    pub min: f64,
    pub max: f64,
}

/// Fixed scaling table for the four housing features, in canonical
/// column order (age, rooms, bedrooms, population).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerTable {
    entries: [ScalerEntry; 4],
}

impl Default for ScalerTable {
    /// The table the production model was trained with.
    fn default() -> Self {
        ScalerTable {
            entries: [
                ScalerEntry { min: 1.0, max: 52.0 },     // housing_median_age
                ScalerEntry { min: 2.0, max: 39320.0 },  // total_rooms
                ScalerEntry { min: 1.0, max: 6445.0 },   // total_bedrooms
                ScalerEntry { min: 5.0, max: 35682.0 },  // population
            ],
        }
    }
}

impl ScalerTable {
    /// Build a table from explicit entries (canonical column order),
    /// rejecting any entry where `max` does not exceed `min`.
    pub fn new(entries: [ScalerEntry; 4]) -> Result<Self, PredictError> {
        for (feature, entry) in Feature::ORDER.iter().zip(entries.iter()) {
            if entry.max <= entry.min {
                return Err(PredictError::Validation(format!(
                    "scaler entry for {feature}: max ({}) must exceed min ({})",
                    entry.max, entry.min
                )));
            }
        }
        Ok(ScalerTable { entries })
    }

    /// The min/max entry for one feature.
    pub fn entry(&self, feature: Feature) -> ScalerEntry {
        self.entries[feature.column()]
    }

    /// Scale a feature vector to the model's input range.
    ///
    /// `(v - min) / (max - min)` per feature; no clamping.
    pub fn normalize(&self, vector: &FeatureVector) -> NormalizedVector {
        let mut values = [0.0; 4];
        for feature in Feature::ORDER {
            let ScalerEntry { min, max } = self.entry(feature);
            values[feature.column()] = (vector.get(feature) - min) / (max - min);
        }
        NormalizedVector { values }
    }

    /// Exact inverse of `normalize`.
    pub fn denormalize(&self, normalized: &NormalizedVector) -> FeatureVector {
        let v = |feature: Feature| {
            let ScalerEntry { min, max } = self.entry(feature);
            normalized.get(feature) * (max - min) + min
        };
        FeatureVector {
            housing_median_age: v(Feature::HousingMedianAge),
            total_rooms: v(Feature::TotalRooms),
            total_bedrooms: v(Feature::TotalBedrooms),
            population: v(Feature::Population),
        }
    }
}

/// A feature vector after min/max scaling, in canonical column order.
///
/// Values are nominally within `[0, 1]` but out-of-range inputs
/// extrapolate past those bounds by design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedVector {
    values: [f64; 4],
}

impl NormalizedVector {
    /// The scaled values in canonical column order.
    pub fn values(&self) -> [f64; 4] {
        self.values
    }

    /// Scaled value of one feature.
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.column()]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
