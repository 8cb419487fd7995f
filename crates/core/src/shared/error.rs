use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds of a single pipeline invocation.
///
/// Each kind maps to a distinct caller response: `Open` and
/// `InsufficientSignal` are problems with the submitted video, `Prediction`
/// and `PredictorUnavailable` are server-side.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VitalsError {
    #[error("failed to open video {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("insufficient signal: {0}")]
    InsufficientSignal(String),

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("no predictor loaded")]
    PredictorUnavailable,

    #[error("face detection failed on frame {frame}: {reason}")]
    Detection { frame: usize, reason: String },

    #[error("cancelled after {frames} frames")]
    Cancelled { frames: usize },
}

impl VitalsError {
    /// True when the submitted video is at fault rather than the service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            VitalsError::Open { .. } | VitalsError::InsufficientSignal(_)
        )
    }
}

/// Startup-time failure loading a trained vitals regressor.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("regressor model not found at {0}; train one offline and pass its path")]
    NotFound(PathBuf),

    #[error("failed to read regressor model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse regressor model {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("regressor model {path} has the wrong shape: {reason}")]
    Shape { path: PathBuf, reason: String },

    #[error("regressor runtime error: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_distinguished_from_service_errors() {
        let open = VitalsError::Open {
            path: PathBuf::from("/tmp/x.mp4"),
            reason: "bad header".into(),
        };
        assert!(open.is_input_error());
        assert!(VitalsError::InsufficientSignal("too short".into()).is_input_error());
        assert!(!VitalsError::Prediction("nan".into()).is_input_error());
        assert!(!VitalsError::PredictorUnavailable.is_input_error());
        assert!(!VitalsError::Detection {
            frame: 3,
            reason: "ort".into()
        }
        .is_input_error());
    }

    #[test]
    fn test_model_not_found_mentions_offline_training() {
        let err = ModelLoadError::NotFound(PathBuf::from("/models/vitals.json"));
        let msg = err.to_string();
        assert!(msg.contains("/models/vitals.json"));
        assert!(msg.contains("train one offline"));
    }

    #[test]
    fn test_display_messages() {
        let err = VitalsError::Open {
            path: PathBuf::from("/tmp/x.mp4"),
            reason: "bad header".into(),
        };
        assert_eq!(err.to_string(), "failed to open video /tmp/x.mp4: bad header");
        assert_eq!(
            VitalsError::Cancelled { frames: 12 }.to_string(),
            "cancelled after 12 frames"
        );
    }
}
