use hepatica_core::PredictError;

/// A pre-trained model mapping one scaled feature row to class probabilities.
pub trait Classifier {
    /// Run one forward pass over a single row.
    fn predict_proba(&self, scaled: &[f32]) -> Result<Vec<f32>, PredictError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict_proba(&self, scaled: &[f32]) -> Result<Vec<f32>, PredictError> {
        (**self).predict_proba(scaled)
    }
}
