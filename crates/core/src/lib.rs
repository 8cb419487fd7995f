//! Remote vital-sign estimation from face video (imaging photoplethysmography).
//!
//! The pipeline reads frames, locates the forehead of the largest face,
//! averages its green channel per frame, bandpasses the series to the
//! heart-rate band and summarizes it into a feature vector that a trained
//! regressor maps to blood pressure and heart rate.

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod face_box;
    pub mod frame;
    pub mod model_resolver;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod image_writer;
        pub mod video_reader;
    }
    pub mod infrastructure {
        pub mod ffmpeg_reader;
        pub mod image_file_writer;
    }
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
        pub mod roi_locator;
    }
    pub mod infrastructure;
}

pub mod signal {
    pub mod domain {
        pub mod bandpass_filter;
        pub mod channel_aggregator;
        pub mod feature_extractor;
        pub mod signal;
        pub mod spectrum;
    }
}

pub mod prediction {
    pub mod domain {
        pub mod vitals_predictor;
        pub mod vitals_regressor;
    }
    pub mod infrastructure {
        pub mod linear_regressor;
        pub mod onnx_regressor;
        pub mod regressor_loader;
    }
}

pub mod pipeline {
    pub mod estimate_vitals_use_case;
    pub mod pipeline_logger;
}
