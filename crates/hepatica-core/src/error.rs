use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{kind} file not found: {}", path.display())]
    ArtifactMissing { kind: &'static str, path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact format: {0}")]
    Format(String),

    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<serde_json::Error> for PredictError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e.to_string())
    }
}
