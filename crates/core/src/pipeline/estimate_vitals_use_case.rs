use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::roi_locator::{locate_in_frame, RoiLocation};
use crate::prediction::domain::vitals_predictor::{VitalsPrediction, VitalsPredictor};
use crate::shared::error::VitalsError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::signal::domain::bandpass_filter::BandpassFilter;
use crate::signal::domain::channel_aggregator::mean_green;
use crate::signal::domain::feature_extractor::{self, FeatureVector};
use crate::signal::domain::signal::RawSignal;
use crate::signal::domain::spectrum::dominant_frequency_bpm;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

use super::pipeline_logger::{stage, PipelineLogger};

/// Progress callback: `(frames_done, total_frames)`. Returning `false`
/// cancels the run.
pub type ProgressFn = Box<dyn Fn(usize, usize) -> bool + Send>;

/// Periodic dump of forehead crops, for checking ROI placement.
pub struct RoiPreview {
    pub writer: Box<dyn ImageWriter>,
    pub output_dir: PathBuf,
    /// Write every `every`-th frame (frame 0 included).
    pub every: usize,
}

/// Signal-side outcome of one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignalReport {
    pub features: FeatureVector,
    /// Spectral pulse estimate inside the passband; diagnostic only.
    pub pulse_bpm: Option<f64>,
    pub frames: usize,
    pub detected_frames: usize,
    pub fps: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VitalsEstimate {
    pub report: SignalReport,
    pub vitals: VitalsPrediction,
}

/// Turns a face video into features and, with a predictor, vitals.
///
/// Frames are processed sequentially: locate the forehead, average its green
/// channel, then bandpass the per-frame series and summarize it. Frames
/// without a usable ROI contribute the sentinel so the series stays aligned
/// with the frame rate. The use case may be run repeatedly; each run opens
/// the reader afresh and closes it before returning.
pub struct EstimateVitalsUseCase {
    reader: Box<dyn VideoReader>,
    detector: Box<dyn FaceDetector>,
    filter: BandpassFilter,
    predictor: Option<VitalsPredictor>,
    logger: Box<dyn PipelineLogger>,
    on_progress: Option<ProgressFn>,
    cancelled: Arc<AtomicBool>,
    roi_preview: Option<RoiPreview>,
}

impl EstimateVitalsUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn FaceDetector>,
        filter: BandpassFilter,
        predictor: Option<VitalsPredictor>,
        logger: Box<dyn PipelineLogger>,
        on_progress: Option<ProgressFn>,
        cancelled: Option<Arc<AtomicBool>>,
        roi_preview: Option<RoiPreview>,
    ) -> Self {
        Self {
            reader,
            detector,
            filter,
            predictor,
            logger,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            roi_preview,
        }
    }

    /// Decodes `path` and returns one green-channel sample per frame.
    ///
    /// Does not require a usable frame rate; the returned signal carries
    /// whatever the container reported.
    pub fn read_raw_signal(&mut self, path: &Path) -> Result<RawSignal, VitalsError> {
        let metadata = self.open(path)?;
        if !metadata.has_usable_fps() {
            log::warn!("{} reports frame rate {}", path.display(), metadata.fps);
        }
        let (raw, _) = self.scan(path, &metadata)?;
        Ok(raw)
    }

    /// Runs the signal stages and returns the feature report.
    pub fn extract_features(&mut self, path: &Path) -> Result<SignalReport, VitalsError> {
        let report = self.analyze(path);
        self.logger.summary();
        report
    }

    /// Runs the full pipeline including prediction.
    ///
    /// Fails with `PredictorUnavailable` before touching the video when no
    /// predictor was injected, and with `InsufficientSignal` when no frame
    /// carried a face.
    pub fn estimate(&mut self, path: &Path) -> Result<VitalsEstimate, VitalsError> {
        let predictor = self
            .predictor
            .clone()
            .ok_or(VitalsError::PredictorUnavailable)?;

        let result = self.analyze(path).and_then(|report| {
            if report.detected_frames == 0 {
                return Err(VitalsError::InsufficientSignal(
                    "no face detected in any frame".to_string(),
                ));
            }
            let start = Instant::now();
            let vitals = predictor.predict(&report.features)?;
            self.logger.timing(stage::PREDICT, elapsed_ms(start));
            Ok(VitalsEstimate { report, vitals })
        });
        self.logger.summary();
        result
    }

    fn analyze(&mut self, path: &Path) -> Result<SignalReport, VitalsError> {
        let metadata = self.open(path)?;
        if !metadata.has_usable_fps() {
            self.reader.close();
            return Err(VitalsError::InsufficientSignal(format!(
                "unusable frame rate {} in {}",
                metadata.fps,
                path.display()
            )));
        }

        let (raw, detected_frames) = self.scan(path, &metadata)?;
        if !raw.is_empty() {
            self.logger
                .metric("detected_ratio", detected_frames as f64 / raw.len() as f64);
        }
        log::debug!(
            "Raw signal: {} samples, {detected_frames} with a face",
            raw.len()
        );

        let start = Instant::now();
        let filtered = self.filter.apply(&raw)?;
        self.logger.timing(stage::FILTER, elapsed_ms(start));

        let start = Instant::now();
        let features = feature_extractor::extract_features(Some(&filtered))?;
        self.logger.timing(stage::FEATURES, elapsed_ms(start));

        let config = self.filter.config();
        let pulse_bpm =
            dominant_frequency_bpm(&filtered, config.low_cutoff_hz, config.high_cutoff_hz);
        log::info!(
            "Features {:?} from {} frames (spectral pulse {:?} bpm)",
            features.as_array(),
            raw.len(),
            pulse_bpm
        );

        Ok(SignalReport {
            features,
            pulse_bpm,
            frames: raw.len(),
            detected_frames,
            fps: raw.fps,
        })
    }

    fn open(&mut self, path: &Path) -> Result<VideoMetadata, VitalsError> {
        let metadata = self.reader.open(path).map_err(|e| VitalsError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.logger.info(&format!(
            "Opened {} ({}x{}, {:.2} fps, {} frames)",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            metadata.total_frames
        ));
        Ok(metadata)
    }

    /// Scans all frames of an opened reader, closing it on every path.
    /// Returns the signal and the number of frames with a located ROI.
    fn scan(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(RawSignal, usize), VitalsError> {
        let scanned = self.scan_frames(path, metadata.total_frames);
        self.reader.close();
        let (samples, detected) = scanned?;
        Ok((RawSignal::new(samples, metadata.fps), detected))
    }

    fn scan_frames(
        &mut self,
        path: &Path,
        total: usize,
    ) -> Result<(Vec<f64>, usize), VitalsError> {
        let mut samples = Vec::with_capacity(total);
        let mut detected = 0;
        let mut frames = self.reader.frames();

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                return Err(VitalsError::Cancelled {
                    frames: samples.len(),
                });
            }

            let start = Instant::now();
            let Some(item) = frames.next() else {
                break;
            };
            let frame = item.map_err(|e| VitalsError::Open {
                path: path.to_path_buf(),
                reason: format!("frame {} failed to decode: {e}", samples.len()),
            })?;
            self.logger.timing(stage::DECODE, elapsed_ms(start));

            let start = Instant::now();
            let location = locate_in_frame(self.detector.as_mut(), &frame).map_err(|e| {
                VitalsError::Detection {
                    frame: frame.index(),
                    reason: e.to_string(),
                }
            })?;
            self.logger.timing(stage::DETECT, elapsed_ms(start));

            let start = Instant::now();
            let roi = location.roi();
            if roi.is_some() {
                detected += 1;
            }
            samples.push(mean_green(&frame, roi.as_ref()));
            self.logger.timing(stage::AGGREGATE, elapsed_ms(start));

            if let Some(preview) = &self.roi_preview {
                write_preview(preview, &frame, &location);
            }

            let done = samples.len();
            self.logger.progress(done, total);
            if let Some(callback) = &self.on_progress {
                if !callback(done, total) {
                    return Err(VitalsError::Cancelled { frames: done });
                }
            }
        }

        Ok((samples, detected))
    }
}

/// Writes the ROI crop of `frame` when it falls on the preview interval.
/// Failures are logged and do not interrupt the scan.
fn write_preview(preview: &RoiPreview, frame: &Frame, location: &RoiLocation) {
    if preview.every == 0 || frame.index() % preview.every != 0 {
        return;
    }
    let Some(roi) = location.roi() else {
        return;
    };
    let path = preview
        .output_dir
        .join(format!("roi_{:06}.png", frame.index()));
    if let Err(e) = preview.writer.write(&path, &frame.crop(&roi)) {
        log::warn!("Failed to write ROI preview {}: {e}", path.display());
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
