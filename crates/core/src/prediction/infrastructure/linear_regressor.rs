//! Multi-output linear regressor stored as JSON:
//!
//! ```json
//! { "coefficients": [[..5..], [..5..], [..5..]], "intercepts": [s, d, hr] }
//! ```
//!
//! Rows are the systolic, diastolic and heart-rate outputs; columns follow
//! the feature order.
use std::path::Path;

use serde::Deserialize;

use crate::prediction::domain::vitals_regressor::{RegressorError, VitalsRegressor};
use crate::shared::constants::{FEATURE_COUNT, VITALS_COUNT};
use crate::shared::error::ModelLoadError;
use crate::signal::domain::feature_extractor::FeatureVector;

#[derive(Deserialize)]
struct LinearModelFile {
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearRegressor {
    coefficients: [[f64; FEATURE_COUNT]; VITALS_COUNT],
    intercepts: [f64; VITALS_COUNT],
}

impl LinearRegressor {
    pub fn new(
        coefficients: [[f64; FEATURE_COUNT]; VITALS_COUNT],
        intercepts: [f64; VITALS_COUNT],
    ) -> Self {
        Self {
            coefficients,
            intercepts,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ModelLoadError::Parse { reason, .. } => ModelLoadError::Parse {
                path: path.to_path_buf(),
                reason,
            },
            ModelLoadError::Shape { reason, .. } => ModelLoadError::Shape {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    fn from_json(text: &str) -> Result<Self, ModelLoadError> {
        let file: LinearModelFile =
            serde_json::from_str(text).map_err(|e| ModelLoadError::Parse {
                path: Default::default(),
                reason: e.to_string(),
            })?;
        let shape_err = |reason: String| ModelLoadError::Shape {
            path: Default::default(),
            reason,
        };

        if file.coefficients.len() != VITALS_COUNT {
            return Err(shape_err(format!(
                "expected {VITALS_COUNT} coefficient rows, found {}",
                file.coefficients.len()
            )));
        }
        if file.intercepts.len() != VITALS_COUNT {
            return Err(shape_err(format!(
                "expected {VITALS_COUNT} intercepts, found {}",
                file.intercepts.len()
            )));
        }

        let mut coefficients = [[0.0; FEATURE_COUNT]; VITALS_COUNT];
        for (row, values) in coefficients.iter_mut().zip(&file.coefficients) {
            if values.len() != FEATURE_COUNT {
                return Err(shape_err(format!(
                    "expected {FEATURE_COUNT} coefficients per row, found {}",
                    values.len()
                )));
            }
            row.copy_from_slice(values);
        }
        let mut intercepts = [0.0; VITALS_COUNT];
        intercepts.copy_from_slice(&file.intercepts);

        if coefficients.iter().flatten().chain(&intercepts).any(|v| !v.is_finite()) {
            return Err(shape_err("model contains non-finite values".to_string()));
        }
        Ok(Self::new(coefficients, intercepts))
    }
}

impl VitalsRegressor for LinearRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; VITALS_COUNT], RegressorError> {
        let x = features.as_array();
        let mut out = self.intercepts;
        for (value, row) in out.iter_mut().zip(&self.coefficients) {
            *value += row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
        }
        Ok(out)
    }
}
