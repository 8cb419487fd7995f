pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Value recorded for frames without a usable forehead ROI.
pub const SIGNAL_SENTINEL: f64 = 0.0;

/// RGB channel carrying the blood-volume pulse (strongest hemoglobin absorption).
pub const GREEN_CHANNEL: usize = 1;

/// Number of statistics in a feature vector.
pub const FEATURE_COUNT: usize = 5;

/// Number of outputs of a vitals regressor: systolic, diastolic, heart rate.
pub const VITALS_COUNT: usize = 3;
