pub mod category;
pub mod error;
pub mod features;
pub mod scaler;

pub use category::{Category, argmax, label_for_index};
pub use error::PredictError;
pub use features::{FEATURE_COLUMNS, FEATURE_COUNT, FeatureVector, PatientInput, Sex};
pub use scaler::StandardScaler;
