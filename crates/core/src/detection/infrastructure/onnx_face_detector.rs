/// YOLO face detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference, and candidate post-processing
/// (neighbour grouping or NMS, depending on `DetectorConfig::min_neighbors`).
use std::path::Path;

use crate::detection::domain::face_detector::{DetectorConfig, FaceDetector};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

use super::candidate_grouping::{group_candidates, nms, RawDetection};
use super::execution_provider::preferred_execution_providers;

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// NMS IoU threshold, used when grouping is disabled.
const NMS_IOU_THRESH: f64 = 0.45;

pub struct OnnxFaceDetector {
    session: ort::session::Session,
    config: DetectorConfig,
    input_size: u32,
}

impl OnnxFaceDetector {
    /// Load a YOLO face ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, config: DetectorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { ref shape, .. }
                    if shape.len() >= 4 && shape[2] > 0 =>
                {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);
        log::debug!("Face detector input size: {input_size}");

        Ok(Self {
            session,
            config,
            input_size,
        })
    }
}

impl FaceDetector for OnnxFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        let (input_tensor, scale, pad_x, pad_y) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }

        // Output is [1, features, detections] (transposed) or [1, detections, features].
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        if num_feats < 5 {
            return Err(format!("YOLO output has {num_feats} features per row, need 5").into());
        }
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;
        let value = |det: usize, feat: usize| -> f64 {
            let idx = if transposed {
                feat * num_dets + det
            } else {
                det * num_feats + feat
            };
            data[idx] as f64
        };

        // Row layout: [cx, cy, w, h, conf, ...landmarks]
        let mut candidates = Vec::new();
        for i in 0..num_dets {
            let conf = value(i, 4);
            if conf < self.config.confidence {
                continue;
            }
            let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
            candidates.push(RawDetection {
                x1: ((cx - w / 2.0) - pad_x as f64) / scale,
                y1: ((cy - h / 2.0) - pad_y as f64) / scale,
                x2: ((cx + w / 2.0) - pad_x as f64) / scale,
                y2: ((cy + h / 2.0) - pad_y as f64) / scale,
                confidence: conf,
            });
        }

        let faces = if self.config.min_neighbors == 0 {
            nms(&mut candidates, NMS_IOU_THRESH)
        } else {
            group_candidates(
                &candidates,
                self.config.scale_factor,
                self.config.min_neighbors,
            )
        };
        log::trace!(
            "Frame {}: {} candidates -> {} faces",
            frame.index(),
            candidates.len(),
            faces.len()
        );
        Ok(faces)
    }
}

/// Letterbox-resize a frame to `target_size` × `target_size`.
///
/// Returns `(NCHW float32 tensor, scale, pad_x, pad_y)`.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, f64, u32, u32) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = (fw * scale).round() as u32;
    let new_h = (fh * scale).round() as u32;
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padding is 114/255 gray, the YOLO training convention
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (tensor, scale, pad_x, pad_y)
}
