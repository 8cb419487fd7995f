/// Per-frame ROI intensities in frame order, sampled at `fps`.
///
/// Frames without a usable ROI hold the sentinel, so `samples.len()` always
/// equals the number of decoded frames.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSignal {
    pub samples: Vec<f64>,
    pub fps: f64,
}

impl RawSignal {
    pub fn new(samples: Vec<f64>, fps: f64) -> Self {
        Self { samples, fps }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Band-limited waveform produced by the bandpass filter.
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredSignal {
    pub samples: Vec<f64>,
    pub fps: f64,
}

impl FilteredSignal {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
