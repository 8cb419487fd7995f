use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

/// Domain interface for face detection.
///
/// Implementations may keep per-invocation scratch state (e.g. an inference
/// session), hence `&mut self`. Each pipeline owns its own detector.
pub trait FaceDetector: Send {
    /// Returns every face found in `frame`, in detector order.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}

/// Detection knobs.
///
/// `scale_factor` is the size step between neighbouring detection scales and
/// `min_neighbors` the number of supporting candidates a face needs beyond
/// itself; `0` disables grouping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub confidence: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 1.0) {
            return Err(format!(
                "Scale factor must be greater than 1.0, got {}",
                self.scale_factor
            ));
        }
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(format!(
                "Confidence must be in (0.0, 1.0], got {}",
                self.confidence
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let config = DetectorConfig::default();
        assert_eq!(config.scale_factor, 1.1);
        assert_eq!(config.min_neighbors, 5);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(1.0, 0.5)]
    #[case(0.9, 0.5)]
    #[case(f64::NAN, 0.5)]
    #[case(1.1, 1.5)]
    #[case(1.1, -0.1)]
    #[case(1.1, 0.0)]
    #[case(1.1, f64::NAN)]
    fn test_invalid_configs_rejected(#[case] scale_factor: f64, #[case] confidence: f64) {
        let config = DetectorConfig {
            scale_factor,
            confidence,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case(0.01)]
    #[case(1.0)]
    fn test_confidence_bounds_accepted(#[case] confidence: f64) {
        let config = DetectorConfig {
            confidence,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
