//! Standardization transform fitted outside this program.
//!
//! The artifact is a JSON object exported from the fitted scaler:
//!
//! ```json
//! { "mean": [..12 values..], "scale": [..12 values..], "feature_names": ["Age", ...] }
//! ```
//!
//! `feature_names` is optional. When present it must match
//! [`FEATURE_COLUMNS`](crate::FEATURE_COLUMNS) exactly.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::PredictError;
use crate::features::FEATURE_COLUMNS;

/// Per-column `(x - mean) / scale` standardization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// Build a scaler from explicit parameters.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, PredictError> {
        let scaler = Self {
            mean,
            scale,
            feature_names: None,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load a scaler artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let text = std::fs::read_to_string(path).map_err(|source| PredictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scaler = Self::from_json_str(&text)?;
        info!(
            columns = scaler.len(),
            scaler = %path.display(),
            "loaded feature scaler"
        );
        Ok(scaler)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PredictError> {
        let scaler: Self = serde_json::from_str(json)?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Number of columns the scaler was fitted on.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Standardize one row. The row length must equal [`Self::len`].
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictError> {
        if row.len() != self.len() {
            return Err(PredictError::ShapeMismatch {
                expected: self.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| (x - mean) / effective_scale(scale))
            .collect())
    }

    // Row length against 12 is checked at transform time, not here.
    fn validate(&self) -> Result<(), PredictError> {
        if self.mean.len() != self.scale.len() {
            return Err(PredictError::Format(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(names) = &self.feature_names
            && names.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied())
        {
            return Err(PredictError::Format(format!(
                "scaler columns {names:?} do not match model columns {FEATURE_COLUMNS:?}"
            )));
        }
        Ok(())
    }
}

/// A zero scale marks a constant column during fitting; it is left unscaled.
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 { 1.0 } else { scale }
}
