use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate from the container. Zero or NaN for malformed files.
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Metadata for a source with nothing to decode.
    pub fn empty(source_path: Option<PathBuf>) -> Self {
        Self {
            width: 0,
            height: 0,
            fps: 0.0,
            total_frames: 0,
            codec: String::new(),
            source_path,
        }
    }

    /// True when the frame rate can serve as a sampling rate.
    pub fn has_usable_fps(&self) -> bool {
        self.fps.is_finite() && self.fps > 0.0
    }
}
