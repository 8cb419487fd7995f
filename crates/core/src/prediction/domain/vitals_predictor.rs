use std::sync::Arc;

use serde::Serialize;

use crate::shared::error::VitalsError;
use crate::signal::domain::feature_extractor::FeatureVector;

use super::vitals_regressor::VitalsRegressor;

/// Rounded vitals, serialized with the keys the reporting layer expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VitalsPrediction {
    pub systolic_bp: i32,
    pub diastolic_bp: i32,
    pub heart_rate: i32,
}

/// Wraps a trained regressor and rounds its raw outputs.
#[derive(Clone)]
pub struct VitalsPredictor {
    regressor: Arc<dyn VitalsRegressor>,
}

impl VitalsPredictor {
    pub fn new(regressor: Arc<dyn VitalsRegressor>) -> Self {
        Self { regressor }
    }

    /// Runs the regressor and rounds each output half-to-even.
    pub fn predict(&self, features: &FeatureVector) -> Result<VitalsPrediction, VitalsError> {
        let raw = self
            .regressor
            .predict(features)
            .map_err(|e| VitalsError::Prediction(e.to_string()))?;
        log::debug!("Raw regressor output: {raw:?}");

        Ok(VitalsPrediction {
            systolic_bp: round_output("systolic_bp", raw[0])?,
            diastolic_bp: round_output("diastolic_bp", raw[1])?,
            heart_rate: round_output("heart_rate", raw[2])?,
        })
    }
}

fn round_output(name: &str, value: f64) -> Result<i32, VitalsError> {
    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return Err(VitalsError::Prediction(format!(
            "regressor returned unusable {name}: {value}"
        )));
    }
    Ok(rounded as i32)
}
