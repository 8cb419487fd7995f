/// Forehead ROI placement as fractions of the face box: (x, y, width, height).
pub const FOREHEAD_FRACTIONS: (f64, f64, f64, f64) = (0.2, 0.1, 0.6, 0.15);

/// A detected face in frame-pixel coordinates.
///
/// Coordinates may fall outside the frame; clipping happens when the
/// forehead ROI is resolved against a concrete frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A rectangle fully inside a frame, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

impl FaceBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width × height, widened so large boxes cannot overflow.
    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Returns the largest box by area.
    ///
    /// Boxes are stably sorted by area descending and the first one wins, so
    /// equal areas resolve to the earliest box in detector order.
    pub fn largest(boxes: &[FaceBox]) -> Option<FaceBox> {
        let mut sorted = boxes.to_vec();
        sorted.sort_by(|a, b| b.area().cmp(&a.area()));
        sorted.first().copied()
    }

    /// Forehead rectangle in frame coordinates, before clipping.
    ///
    /// Offsets and sizes truncate toward zero.
    pub fn forehead(&self) -> FaceBox {
        let (fx, fy, fw, fh) = FOREHEAD_FRACTIONS;
        let w = self.width as f64;
        let h = self.height as f64;
        FaceBox {
            x: self.x + (fx * w) as i32,
            y: self.y + (fy * h) as i32,
            width: (fw * w) as i32,
            height: (fh * h) as i32,
        }
    }

    /// Intersects this rectangle with a `frame_width` × `frame_height` frame.
    ///
    /// Returns `None` when nothing of the rectangle is visible.
    pub fn clip(&self, frame_width: u32, frame_height: u32) -> Option<Roi> {
        let x1 = (self.x as i64).max(0);
        let y1 = (self.y as i64).max(0);
        let x2 = (self.x as i64 + self.width as i64).min(frame_width as i64);
        let y2 = (self.y as i64 + self.height as i64).min(frame_height as i64);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Roi {
            x: x1 as u32,
            y: y1 as u32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }
}
