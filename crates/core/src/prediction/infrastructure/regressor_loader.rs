use std::path::Path;
use std::sync::Arc;

use crate::prediction::domain::vitals_regressor::VitalsRegressor;
use crate::shared::error::ModelLoadError;

use super::linear_regressor::LinearRegressor;
use super::onnx_regressor::OnnxRegressor;

/// Loads a trained regressor, choosing the backend by file extension
/// (`.json` linear model, `.onnx` ONNX model).
///
/// A missing file is reported as `ModelLoadError::NotFound`; training is a
/// separate offline step and never happens here.
pub fn load_regressor(path: &Path) -> Result<Arc<dyn VitalsRegressor>, ModelLoadError> {
    if !path.is_file() {
        return Err(ModelLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let regressor: Arc<dyn VitalsRegressor> = match ext.as_deref() {
        Some("json") => Arc::new(LinearRegressor::from_file(path)?),
        Some("onnx") => Arc::new(OnnxRegressor::new(path)?),
        _ => {
            return Err(ModelLoadError::Parse {
                path: path.to_path_buf(),
                reason: "unsupported model format (expected .json or .onnx)".to_string(),
            })
        }
    };
    log::info!("Loaded vitals regressor from {}", path.display());
    Ok(regressor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::domain::feature_extractor::FeatureVector;

    #[test]
    fn test_missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitals.json");
        let err = load_regressor(&path).err().unwrap();
        assert!(matches!(err, ModelLoadError::NotFound(p) if p == path));
    }

    #[test]
    fn test_directory_is_not_a_model() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_regressor(dir.path()),
            Err(ModelLoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_json_extension_loads_linear_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Vitals.JSON");
        std::fs::write(
            &path,
            r#"{"coefficients": [[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,1]], "intercepts": [120, 80, 60]}"#,
        )
        .unwrap();
        let regressor = load_regressor(&path).unwrap();
        let out = regressor
            .predict(&FeatureVector::new([0.0, 0.0, 0.0, 0.0, 5.0]))
            .unwrap();
        assert_eq!(out, [120.0, 80.0, 65.0]);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitals.pkl");
        std::fs::write(&path, b"\x80\x04").unwrap();
        assert!(matches!(
            load_regressor(&path),
            Err(ModelLoadError::Parse { .. })
        ));
    }
}
