//! Startup artifact locations and the presence check run before anything loads.

use std::path::PathBuf;

use hepatica_core::PredictError;

pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_MODEL_FILE: &str = "hepatitis_model.onnx";

/// Where the fitted scaler and the trained classifier live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            scaler: PathBuf::from(DEFAULT_SCALER_FILE),
            model: PathBuf::from(DEFAULT_MODEL_FILE),
        }
    }
}

impl ArtifactPaths {
    pub fn new(scaler: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            scaler: scaler.into(),
            model: model.into(),
        }
    }

    /// Fail on the first missing artifact. The scaler is checked first.
    pub fn check(&self) -> Result<(), PredictError> {
        for (kind, path) in [("scaler", &self.scaler), ("model", &self.model)] {
            if !path.is_file() {
                return Err(PredictError::ArtifactMissing {
                    kind,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }
}
