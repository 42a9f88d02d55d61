pub mod utils;
pub mod pipeline;
pub mod config;
pub mod helper;
pub mod modules;
pub mod error;

pub use config::config::{FaceEventConfig, LandmarkPolicy};
pub use error::TransformError;
pub use helper::face_helper::{DetectedFace, DetectedLandmark, FaceHelper, NormalizedFace, TransformContext};
pub use modules::faces_detected_event::FacesDetectedEvent;
pub use pipeline::pipeline::FaceEventPipeline;
