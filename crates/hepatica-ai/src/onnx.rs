//! ONNX Runtime classifier for the exported hepatitis model.
//!
//! The graph takes one `float32[1, 12]` input and produces one
//! `float32[1, 5]` softmax output.

use std::path::Path;
use std::sync::Mutex;

use hepatica_core::PredictError;
use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use crate::classifier::Classifier;

/// Classifier backed by a single ONNX Runtime session.
///
/// The session is built once and never reloaded. Runs need exclusive access,
/// so the session sits behind a mutex and inference takes `&self`.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    n_features: Option<usize>,
}

impl OnnxClassifier {
    /// Load a model from an `.onnx` file.
    pub fn load(model_path: &Path) -> Result<Self, PredictError> {
        if !model_path.exists() {
            return Err(PredictError::ArtifactMissing {
                kind: "model",
                path: model_path.to_path_buf(),
            });
        }

        let session = Session::builder()
            .map_err(|e| load_error(model_path, e))?
            .commit_from_file(model_path)
            .map_err(|e| load_error(model_path, e))?;

        // Last input dimension is the feature count, when the graph declares it.
        let n_features = session
            .inputs()
            .first()
            .and_then(|input| last_dim(input.dtype()));

        info!(?n_features, model = %model_path.display(), "loaded classifier model");
        Ok(Self {
            session: Mutex::new(session),
            n_features,
        })
    }

    /// Feature count declared by the model input, if static.
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, scaled: &[f32]) -> Result<Vec<f32>, PredictError> {
        if let Some(expected) = self.n_features
            && expected != scaled.len()
        {
            return Err(PredictError::ShapeMismatch {
                expected,
                actual: scaled.len(),
            });
        }

        let shape = [1i64, scaled.len() as i64];
        let input = Tensor::from_array((shape, scaled.to_vec().into_boxed_slice()))
            .map_err(inference_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictError::Inference("classifier session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(inference_error)?;

        let (output_shape, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;
        let dims: &[i64] = output_shape;
        debug!(?dims, "classifier output");

        Ok(output_data.to_vec())
    }
}

fn load_error(path: &Path, e: impl std::fmt::Display) -> PredictError {
    PredictError::Format(format!("load {}: {e}", path.display()))
}

fn inference_error(e: impl std::fmt::Display) -> PredictError {
    PredictError::Inference(e.to_string())
}

fn last_dim(value_type: &ort::value::ValueType) -> Option<usize> {
    match value_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
