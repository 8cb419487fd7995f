use ndarray::{s, ArrayView3};

use crate::shared::face_box::Roi;

/// A single decoded video frame: contiguous RGB bytes in row-major order.
///
/// Frames are immutable once read. Format conversion happens in the reader;
/// everything downstream indexes pixels as `(row, column, channel)`.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels under `roi` into a new frame carrying the same index.
    ///
    /// `roi` must already be clipped to this frame.
    pub fn crop(&self, roi: &Roi) -> Frame {
        let (x, y) = (roi.x as usize, roi.y as usize);
        let (w, h) = (roi.width as usize, roi.height as usize);
        let view = self.as_ndarray();
        let pixels = view.slice(s![y..y + h, x..x + w, ..]);
        let data: Vec<u8> = pixels.iter().copied().collect();
        Frame::new(data, roi.width, roi.height, self.channels, self.index)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
