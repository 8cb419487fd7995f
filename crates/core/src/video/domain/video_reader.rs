use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a video source.
///
/// Implementations handle codec and container details; the pipeline only
/// sees `Frame` and `VideoMetadata`. The frame sequence is lazy and finite,
/// and cannot be restarted without reopening.
pub trait VideoReader: Send {
    /// Opens a video file and returns its metadata.
    ///
    /// An empty file opens successfully and yields no frames.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in presentation order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases decoder resources. Safe to call more than once.
    fn close(&mut self);
}
