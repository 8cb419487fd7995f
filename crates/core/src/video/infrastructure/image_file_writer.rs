use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes RGB frames to image files using the `image` crate.
///
/// The output format follows the path extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_write_creates_parent_dirs_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roi").join("00001.png");
        let writer = ImageFileWriter::new();
        writer.write(&path, &make_frame(12, 4, [10, 20, 30])).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let writer = ImageFileWriter::new();
        writer.write(&path, &make_frame(30, 20, [50, 100, 200])).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.width(), 30);
        assert_eq!(img.height(), 20);
        assert_eq!(img.get_pixel(29, 19).0, [50, 100, 200]);
    }

    #[test]
    fn test_write_rejects_non_rgb_frame() {
        let dir = tempfile::tempdir().unwrap();
        let frame = Frame::new(vec![0u8; 16], 4, 4, 1, 0);
        let writer = ImageFileWriter::new();
        assert!(writer.write(&dir.path().join("gray.png"), &frame).is_err());
    }

    #[test]
    fn test_write_under_a_file_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();
        let writer = ImageFileWriter::new();
        let result = writer.write(&blocker.join("out.png"), &make_frame(2, 2, [0, 0, 0]));
        assert!(result.is_err());
    }
}
