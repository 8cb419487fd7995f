use ndarray::Array1;
use serde::Serialize;

use crate::shared::constants::FEATURE_COUNT;
use crate::shared::error::VitalsError;
use crate::signal::domain::signal::FilteredSignal;

/// Summary statistics of a filtered signal, in fixed order:
/// mean, population std, min, max, peak-to-peak.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn mean(&self) -> f64 {
        self.0[0]
    }

    pub fn std(&self) -> f64 {
        self.0[1]
    }

    pub fn min(&self) -> f64 {
        self.0[2]
    }

    pub fn max(&self) -> f64 {
        self.0[3]
    }

    pub fn ptp(&self) -> f64 {
        self.0[4]
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// Computes the feature vector, failing on an absent or empty signal.
pub fn extract_features(signal: Option<&FilteredSignal>) -> Result<FeatureVector, VitalsError> {
    let signal = signal
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VitalsError::InsufficientSignal("no filtered samples".to_string()))?;

    let values = Array1::from(signal.samples.clone());
    let mean = values
        .mean()
        .ok_or_else(|| VitalsError::InsufficientSignal("no filtered samples".to_string()))?;
    let std = values.std(0.0);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(FeatureVector([mean, std, min, max, max - min]))
}
