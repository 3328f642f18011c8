//! Shared types for the HOUSECAST client.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that scaler, tensor, backend,
//! and dispatch modules can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// One of the four housing features the model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    HousingMedianAge,
    TotalRooms,
    TotalBedrooms,
    Population,
}

impl Feature {
    /// Canonical column order: age, rooms, bedrooms, population.
    ///
    /// The scaler table and tensor layout both depend on this order.
    /// Reordering silently breaks inference against the trained model.
    pub const ORDER: [Feature; 4] = [
        Feature::HousingMedianAge,
        Feature::TotalRooms,
        Feature::TotalBedrooms,
        Feature::Population,
    ];

    /// Wire/form field name for this feature.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::HousingMedianAge => "housing_median_age",
            Feature::TotalRooms => "total_rooms",
            Feature::TotalBedrooms => "total_bedrooms",
            Feature::Population => "population",
        }
    }

    /// Position of this feature in the canonical column order.
    pub fn column(&self) -> usize {
        match self {
            Feature::HousingMedianAge => 0,
            Feature::TotalRooms => 1,
            Feature::TotalBedrooms => 2,
            Feature::Population => 3,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// A validated set of the four housing features.
///
/// Field names double as the JSON body keys for the remote backends,
/// so the serde representation is the outbound wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub housing_median_age: f64,
    pub total_rooms: f64,
    pub total_bedrooms: f64,
    pub population: f64,
}

impl FeatureVector {
    /// Build a vector from already-numeric values, rejecting non-finite ones.
    pub fn new(
        housing_median_age: f64,
        total_rooms: f64,
        total_bedrooms: f64,
        population: f64,
    ) -> Result<Self, PredictError> {
        let v = FeatureVector {
            housing_median_age,
            total_rooms,
            total_bedrooms,
            population,
        };
        for feature in Feature::ORDER {
            if !v.get(feature).is_finite() {
                return Err(PredictError::Validation(format!(
                    "{feature} must be a finite number, got {}",
                    v.get(feature)
                )));
            }
        }
        Ok(v)
    }

    /// Parse a raw form submission into a validated vector.
    ///
    /// Every field must be present and coerce to a finite number.
    /// Absent or non-numeric fields are an error, never silently defaulted.
    pub fn parse(form: &RawFeatureForm) -> Result<Self, PredictError> {
        Self::new(
            parse_field(Feature::HousingMedianAge, form.housing_median_age.as_deref())?,
            parse_field(Feature::TotalRooms, form.total_rooms.as_deref())?,
            parse_field(Feature::TotalBedrooms, form.total_bedrooms.as_deref())?,
            parse_field(Feature::Population, form.population.as_deref())?,
        )
    }

    /// Value of a single feature.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::HousingMedianAge => self.housing_median_age,
            Feature::TotalRooms => self.total_rooms,
            Feature::TotalBedrooms => self.total_bedrooms,
            Feature::Population => self.population,
        }
    }

    /// Return a new vector with one field replaced by a re-parsed raw value.
    ///
    /// Pure: `self` is untouched. On a bad input the caller gets the error
    /// and can keep using the previous vector — that choice stays with the
    /// caller instead of being made here.
    pub fn updated(&self, feature: Feature, raw: &str) -> Result<Self, PredictError> {
        let value = parse_field(feature, Some(raw))?;
        let mut next = *self;
        match feature {
            Feature::HousingMedianAge => next.housing_median_age = value,
            Feature::TotalRooms => next.total_rooms = value,
            Feature::TotalBedrooms => next.total_bedrooms = value,
            Feature::Population => next.population = value,
        }
        Ok(next)
    }

    /// Helper to build a test vector with plausible values.
    #[cfg(test)]
    pub fn sample() -> Self {
        FeatureVector {
            housing_median_age: 25.0,
            total_rooms: 2500.0,
            total_bedrooms: 500.0,
            population: 1200.0,
        }
    }
}

fn parse_field(feature: Feature, raw: Option<&str>) -> Result<f64, PredictError> {
    let raw = raw
        .ok_or_else(|| PredictError::Validation(format!("missing feature: {feature}")))?;
    let value: f64 = raw.trim().parse().map_err(|_| {
        PredictError::Validation(format!("{feature} is not numeric: {raw:?}"))
    })?;
    if !value.is_finite() {
        return Err(PredictError::Validation(format!(
            "{feature} must be a finite number, got {raw:?}"
        )));
    }
    Ok(value)
}

/// Raw, unvalidated form input — each field exactly as the user typed it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeatureForm {
    pub housing_median_age: Option<String>,
    pub total_rooms: Option<String>,
    pub total_bedrooms: Option<String>,
    pub population: Option<String>,
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which prediction backend a request should be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Remote endpoint of the hard-code deployment.
    HardCode,
    /// Remote endpoint of the TF Serving deployment.
    TfServing,
    /// Fully client-side graph-model inference.
    TfJs,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::HardCode => "hard-code",
            Mode::TfServing => "tf-serving",
            Mode::TfJs => "tf-js",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hard-code" => Ok(Mode::HardCode),
            "tf-serving" => Ok(Mode::TfServing),
            "tf-js" => Ok(Mode::TfJs),
            other => Err(PredictError::UnknownMode(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PredictionResult
// ---------------------------------------------------------------------------

/// Unified outcome of a prediction request.
///
/// Exactly one variant is ever populated; a new result fully replaces
/// any previous one, so a failure can never leave a stale price visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionResult {
    Ok { price: f64 },
    Err { reason: String },
}

impl PredictionResult {
    /// The price, if this prediction succeeded.
    pub fn price(&self) -> Option<f64> {
        match self {
            PredictionResult::Ok { price } => Some(*price),
            PredictionResult::Err { .. } => None,
        }
    }

    /// The failure reason, if this prediction failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            PredictionResult::Ok { .. } => None,
            PredictionResult::Err { reason } => Some(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, PredictionResult::Ok { .. })
    }
}

impl From<Result<f64, PredictError>> for PredictionResult {
    fn from(result: Result<f64, PredictError>) -> Self {
        match result {
            Ok(price) => PredictionResult::Ok { price },
            Err(e) => PredictionResult::Err {
                reason: e.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong between a form submission and a price.
///
/// Every variant is converted to `PredictionResult::Err` at the dispatcher
/// boundary; nothing propagates past it as a Rust error.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Malformed or missing feature input, rejected before dispatch.
    #[error("invalid feature input: {0}")]
    Validation(String),

    /// A mode string with no registered backend — a configuration error,
    /// never a silent fallback.
    #[error("unrecognized prediction mode: {0:?}")]
    UnknownMode(String),

    /// Network failure or non-2xx status on a remote call.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Remote response missing or malformed `price`.
    #[error("malformed prediction response: {0}")]
    ResponseParse(String),

    /// Model artifact fetch or parse failure.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// Tensor shape incompatible with the loaded model.
    #[error("tensor shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Model execution failure.
    #[error("inference failed: {0}")]
    Inference(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
