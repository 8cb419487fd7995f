use ndarray::s;

use crate::shared::constants::{GREEN_CHANNEL, SIGNAL_SENTINEL};
use crate::shared::face_box::Roi;
use crate::shared::frame::Frame;

/// Mean green intensity over `roi`, or the sentinel when there is no ROI.
///
/// `roi` must lie inside `frame` (as produced by the ROI locator).
pub fn mean_green(frame: &Frame, roi: Option<&Roi>) -> f64 {
    match roi {
        Some(roi) if !roi.is_empty() => mean_channel(frame, roi, GREEN_CHANNEL),
        _ => SIGNAL_SENTINEL,
    }
}

fn mean_channel(frame: &Frame, roi: &Roi, channel: usize) -> f64 {
    let (x, y) = (roi.x as usize, roi.y as usize);
    let (w, h) = (roi.width as usize, roi.height as usize);
    let view = frame.as_ndarray();
    let plane = view.slice(s![y..y + h, x..x + w, channel]);

    let sum: u64 = plane.iter().map(|&v| v as u64).sum();
    sum as f64 / roi.area() as f64
}
