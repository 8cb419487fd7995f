use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::{FaceBox, Roi};
use crate::shared::frame::Frame;

/// Result of locating the forehead in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoiLocation {
    /// The detector found no face.
    NoFace,
    /// A face was selected but its forehead crop is empty inside the frame.
    EmptyRoi(FaceBox),
    /// Forehead ROI of the selected face, clipped to the frame.
    Found { face: FaceBox, roi: Roi },
}

impl RoiLocation {
    pub fn roi(&self) -> Option<Roi> {
        match self {
            RoiLocation::Found { roi, .. } => Some(*roi),
            _ => None,
        }
    }
}

/// Resolves detector output for one frame into a forehead ROI.
///
/// Keeps only the largest face and applies the fixed forehead fractions.
pub fn locate(faces: &[FaceBox], frame_width: u32, frame_height: u32) -> RoiLocation {
    let Some(face) = FaceBox::largest(faces) else {
        return RoiLocation::NoFace;
    };
    match face.forehead().clip(frame_width, frame_height) {
        Some(roi) if !roi.is_empty() => RoiLocation::Found { face, roi },
        _ => RoiLocation::EmptyRoi(face),
    }
}

/// Runs `detector` on `frame` and locates the forehead ROI.
pub fn locate_in_frame(
    detector: &mut dyn FaceDetector,
    frame: &Frame,
) -> Result<RoiLocation, Box<dyn std::error::Error>> {
    let faces = detector.detect(frame)?;
    Ok(locate(&faces, frame.width(), frame.height()))
}
