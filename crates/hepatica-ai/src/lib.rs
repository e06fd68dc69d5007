//! Inference layer: artifact loading, the classifier seam, and the prediction adapter.

pub mod artifacts;
mod classifier;
#[cfg(feature = "onnx")]
mod onnx;
mod predictor;

pub use artifacts::ArtifactPaths;
pub use classifier::Classifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use predictor::{Prediction, Predictor};
