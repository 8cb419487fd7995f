/// Vitals regressor backed by an ONNX model (e.g. an exported
/// scikit-learn pipeline) via `ort`.
///
/// Expects a single `[1, 5]` float input and a first output holding three
/// values (systolic, diastolic, heart rate).
use std::path::Path;
use std::sync::Mutex;

use crate::prediction::domain::vitals_regressor::{RegressorError, VitalsRegressor};
use crate::shared::constants::{FEATURE_COUNT, VITALS_COUNT};
use crate::shared::error::ModelLoadError;
use crate::signal::domain::feature_extractor::FeatureVector;

pub struct OnnxRegressor {
    // `Session::run` needs `&mut`; the lock keeps the regressor shareable.
    session: Mutex<ort::session::Session>,
}

impl OnnxRegressor {
    pub fn new(model_path: &Path) -> Result<Self, ModelLoadError> {
        let session = ort::session::Session::builder()
            .map_err(runtime_err)?
            .with_intra_threads(1)
            .map_err(runtime_err)?
            .commit_from_file(model_path)
            .map_err(runtime_err)?;

        if session.inputs().len() != 1 {
            return Err(ModelLoadError::Shape {
                path: model_path.to_path_buf(),
                reason: format!("expected 1 input, found {}", session.inputs().len()),
            });
        }
        if session.outputs().is_empty() {
            return Err(ModelLoadError::Shape {
                path: model_path.to_path_buf(),
                reason: "model has no outputs".to_string(),
            });
        }
        log::debug!("Loaded ONNX regressor from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

fn runtime_err(e: impl std::fmt::Display) -> ModelLoadError {
    ModelLoadError::Runtime(e.to_string())
}

impl VitalsRegressor for OnnxRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; VITALS_COUNT], RegressorError> {
        let input = ndarray::Array2::<f32>::from_shape_fn((1, FEATURE_COUNT), |(_, i)| {
            features.as_array()[i] as f32
        });
        let input_value = ort::value::Tensor::from_array(input).map_err(|e| e.to_string())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| "regressor session lock poisoned")?;
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| e.to_string())?;
        if outputs.len() == 0 {
            return Err("regressor produced no outputs".into());
        }

        let values: Vec<f64> = match outputs[0].try_extract_array::<f32>() {
            Ok(tensor) => tensor.iter().map(|&v| v as f64).collect(),
            Err(_) => outputs[0]
                .try_extract_array::<f64>()
                .map_err(|e| e.to_string())?
                .iter()
                .copied()
                .collect(),
        };
        if values.len() != VITALS_COUNT {
            return Err(format!(
                "regressor returned {} values, expected {VITALS_COUNT}",
                values.len()
            )
            .into());
        }
        Ok([values[0], values[1], values[2]])
    }
}
