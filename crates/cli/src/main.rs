use std::path::PathBuf;
use std::process;

use clap::Parser;

use pulsecam_core::detection::domain::face_detector::{
    DetectorConfig, FaceDetector, DEFAULT_CONFIDENCE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};
use pulsecam_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use pulsecam_core::pipeline::estimate_vitals_use_case::{
    EstimateVitalsUseCase, ProgressFn, RoiPreview,
};
use pulsecam_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use pulsecam_core::prediction::domain::vitals_predictor::VitalsPredictor;
use pulsecam_core::prediction::infrastructure::regressor_loader::load_regressor;
use pulsecam_core::shared::constants::{YOLO_MODEL_NAME, YOLO_MODEL_URL};
use pulsecam_core::shared::error::VitalsError;
use pulsecam_core::shared::model_resolver;
use pulsecam_core::signal::domain::bandpass_filter::{
    BandpassConfig, BandpassFilter, DEFAULT_HIGH_CUTOFF_HZ, DEFAULT_LOW_CUTOFF_HZ,
    DEFAULT_MIN_SAMPLES, DEFAULT_ORDER,
};
use pulsecam_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use pulsecam_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Exit code for problems with the submitted video.
const EXIT_INPUT: i32 = 2;
/// Exit code for everything else (model, runtime, cancellation).
const EXIT_FAILURE: i32 = 1;

/// Estimate blood pressure and heart rate from a face video.
#[derive(Parser)]
#[command(name = "pulsecam")]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Trained vitals regressor (.json linear model or .onnx).
    #[arg(long, required_unless_present = "features_only")]
    model: Option<PathBuf>,

    /// Print the feature vector instead of predicting vitals.
    #[arg(long)]
    features_only: bool,

    /// Detector scale step; neighbouring candidates may differ by two steps in size.
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Candidates that must support a face before it is accepted (0 = plain NMS).
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: u32,

    /// Face detection confidence threshold, above 0.0 and at most 1.0.
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Lower edge of the pulse band in Hz.
    #[arg(long, default_value_t = DEFAULT_LOW_CUTOFF_HZ)]
    low_cutoff: f64,

    /// Upper edge of the pulse band in Hz.
    #[arg(long, default_value_t = DEFAULT_HIGH_CUTOFF_HZ)]
    high_cutoff: f64,

    /// Butterworth filter order.
    #[arg(long, default_value_t = DEFAULT_ORDER)]
    filter_order: usize,

    /// Save forehead ROI crops to this directory.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Save a ROI crop every Nth frame.
    #[arg(long, default_value = "30")]
    preview_every: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        let code = match e.downcast_ref::<VitalsError>() {
            Some(err) if err.is_input_error() => EXIT_INPUT,
            _ => EXIT_FAILURE,
        };
        process::exit(code);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    // Model errors surface before the detector model is resolved
    let predictor = match (&cli.model, cli.features_only) {
        (Some(path), false) => Some(VitalsPredictor::new(load_regressor(path)?)),
        _ => None,
    };
    let detector = build_detector(&cli)?;
    let filter = BandpassFilter::new(bandpass_config(&cli));

    let roi_preview = cli.preview.as_ref().map(|dir| RoiPreview {
        writer: Box::new(ImageFileWriter::new()),
        output_dir: dir.clone(),
        every: cli.preview_every,
    });
    let progress: ProgressFn = Box::new(|current, total| {
        if total > 0 {
            eprint!("\rScanning frame {current}/{total}");
        } else {
            eprint!("\rScanning frame {current}");
        }
        true
    });

    let mut use_case = EstimateVitalsUseCase::new(
        Box::new(FfmpegReader::new()),
        detector,
        filter,
        predictor,
        Box::new(StdoutPipelineLogger::default()),
        Some(progress),
        None,
        roi_preview,
    );

    let json = if cli.features_only {
        let report = use_case.extract_features(&cli.input);
        eprintln!();
        serde_json::to_string_pretty(&report?)?
    } else {
        let estimate = use_case.estimate(&cli.input);
        eprintln!();
        let estimate = estimate?;
        log::info!(
            "Features {:?}, spectral pulse {:?} bpm",
            estimate.report.features.as_array(),
            estimate.report.pulse_bpm
        );
        serde_json::to_string_pretty(&estimate.vitals)?
    };
    println!("{json}");

    if let Some(dir) = &cli.preview {
        log::info!("ROI previews written to {}", dir.display());
    }
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(Box::new(OnnxFaceDetector::new(
        &model_path,
        detector_config(cli),
    )?))
}

fn detector_config(cli: &Cli) -> DetectorConfig {
    DetectorConfig {
        scale_factor: cli.scale_factor,
        min_neighbors: cli.min_neighbors,
        confidence: cli.confidence,
    }
}

fn bandpass_config(cli: &Cli) -> BandpassConfig {
    BandpassConfig {
        low_cutoff_hz: cli.low_cutoff,
        high_cutoff_hz: cli.high_cutoff,
        order: cli.filter_order,
        min_samples: DEFAULT_MIN_SAMPLES,
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.features_only && cli.model.is_some() {
        log::warn!("--model is ignored with --features-only");
    }
    detector_config(cli).validate()?;
    bandpass_config(cli).validate()?;
    if cli.filter_order > 8 {
        return Err(format!(
            "Filter order must be between 1 and 8, got {}",
            cli.filter_order
        )
        .into());
    }
    if cli.preview.is_some() && cli.preview_every == 0 {
        return Err("--preview-every must be at least 1".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("pulsecam").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_match_library_defaults() {
        let cli = parse(&["clip.mp4", "--model", "vitals.json"]).unwrap();
        assert_eq!(detector_config(&cli), DetectorConfig::default());
        assert_eq!(bandpass_config(&cli), BandpassConfig::default());
        assert!(!cli.features_only);
    }

    #[test]
    fn test_model_required_unless_features_only() {
        assert!(parse(&["clip.mp4"]).is_err());
        let cli = parse(&["clip.mp4", "--features-only"]).unwrap();
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_flags_map_onto_configs() {
        let cli = parse(&[
            "clip.mp4",
            "--features-only",
            "--scale-factor",
            "1.2",
            "--min-neighbors",
            "0",
            "--low-cutoff",
            "0.7",
            "--high-cutoff",
            "3.5",
            "--filter-order",
            "2",
        ])
        .unwrap();
        let detector = detector_config(&cli);
        assert_eq!(detector.scale_factor, 1.2);
        assert_eq!(detector.min_neighbors, 0);
        let bandpass = bandpass_config(&cli);
        assert_eq!(bandpass.low_cutoff_hz, 0.7);
        assert_eq!(bandpass.high_cutoff_hz, 3.5);
        assert_eq!(bandpass.order, 2);
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let cli = parse(&["/definitely/not/here.mp4", "--features-only"]).unwrap();
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let file = tempfile_path();
        let cli = parse(&[
            file.to_str().unwrap(),
            "--features-only",
            "--low-cutoff",
            "4.0",
            "--high-cutoff",
            "1.0",
        ])
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_preview_interval() {
        let file = tempfile_path();
        let cli = parse(&[
            file.to_str().unwrap(),
            "--features-only",
            "--preview",
            "/tmp/roi",
            "--preview-every",
            "0",
        ])
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_confidence() {
        let file = tempfile_path();
        let cli = parse(&[
            file.to_str().unwrap(),
            "--features-only",
            "--confidence",
            "0",
        ])
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    /// An existing file to stand in for the input video.
    fn tempfile_path() -> PathBuf {
        std::env::current_exe().unwrap()
    }
}
