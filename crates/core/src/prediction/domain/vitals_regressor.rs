use crate::shared::constants::VITALS_COUNT;
use crate::signal::domain::feature_extractor::FeatureVector;

/// Error type for regressor backends; `Send + Sync` so a shared regressor
/// can report failures across invocation threads.
pub type RegressorError = Box<dyn std::error::Error + Send + Sync>;

/// Port for a trained model mapping features to
/// `[systolic, diastolic, heart_rate]`.
///
/// Implementations are read-only after loading and may be shared between
/// concurrent pipeline invocations.
pub trait VitalsRegressor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; VITALS_COUNT], RegressorError>;
}
