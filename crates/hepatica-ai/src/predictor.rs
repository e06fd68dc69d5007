//! Prediction adapter: encode, scale, infer, and label one patient.
//!
//! Each call is an independent transaction over immutable artifacts. Any
//! failure returns a [`PredictError`] and produces no partial result.

use hepatica_core::{Category, PatientInput, PredictError, StandardScaler, argmax, label_for_index};
use serde::Serialize;
use tracing::debug;

use crate::classifier::Classifier;

/// Outcome of one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class_index: usize,
    /// One of the five category labels, or `"Unknown"`.
    pub label: &'static str,
    /// Raw classifier output.
    pub probabilities: Vec<f32>,
}

/// The loaded scaler and classifier, held for the process lifetime.
pub struct Predictor<C> {
    scaler: StandardScaler,
    classifier: C,
}

impl<C: Classifier> Predictor<C> {
    pub fn new(scaler: StandardScaler, classifier: C) -> Self {
        Self { scaler, classifier }
    }

    pub fn predict(&self, input: &PatientInput) -> Result<Prediction, PredictError> {
        let features = input.to_features();
        let scaled: Vec<f32> = self
            .scaler
            .transform(features.as_slice())?
            .into_iter()
            .map(|x| x as f32)
            .collect();

        let probabilities = self.classifier.predict_proba(&scaled)?;
        if probabilities.is_empty() {
            return Err(PredictError::ShapeMismatch {
                expected: Category::ALL.len(),
                actual: 0,
            });
        }
        let class_index = argmax(&probabilities)
            .filter(|&i| probabilities[i].is_finite())
            .ok_or_else(|| {
                PredictError::Inference("classifier output has no finite maximum".into())
            })?;
        let label = label_for_index(class_index);

        debug!(class_index, label, ?probabilities, "prediction");
        Ok(Prediction {
            class_index,
            label,
            probabilities,
        })
    }
}

#[cfg(feature = "onnx")]
impl Predictor<crate::OnnxClassifier> {
    /// Check both artifacts exist, then load each exactly once.
    pub fn load(paths: &crate::ArtifactPaths) -> Result<Self, PredictError> {
        paths.check()?;
        let scaler = StandardScaler::load(&paths.scaler)?;
        let classifier = crate::OnnxClassifier::load(&paths.model)?;
        Ok(Self::new(scaler, classifier))
    }
}
