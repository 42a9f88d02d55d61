use serde::Serialize;
use serde_json::Value;
use crate::error::TransformError;
use crate::helper::face_helper::{DetectedFace, FaceHelper, NormalizedFace, TransformContext};
use crate::utils::coordinate::ImageDimensions;

pub const EVENT_ON_FACES_DETECTED: &str = "onFacesDetected";

/// Payload delivered to a view whenever the detector reports a frame.
///
/// Events are plain values. Ownership moves to the emitter on dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacesDetectedEvent {
    #[serde(rename = "type")]
    kind: &'static str,
    faces: Vec<NormalizedFace>,
    #[serde(rename = "target")]
    view_tag: i32,
}

impl FacesDetectedEvent {
    pub fn new(view_tag: i32, faces: Vec<NormalizedFace>) -> Self {
        FacesDetectedEvent { kind: "face", faces, view_tag }
    }

    /// obtain normalizes a frame's detections and wraps them in an event.
    ///
    /// # Arguments
    /// * `helper` - face helper carrying the landmark policy
    /// * `view_tag` - target view
    /// * `faces` - detections of one frame
    /// * `dimensions` - frame dimensions, providing source width and facing
    /// * `scale` - source to view scale factor
    /// * `shift_x` - horizontal offset
    /// * `shift_y` - vertical offset
    ///
    /// # Returns
    /// * `Result<FacesDetectedEvent, TransformError>`
    pub fn obtain(
        helper: &FaceHelper,
        view_tag: i32,
        faces: &[DetectedFace],
        dimensions: &ImageDimensions,
        scale: f64,
        shift_x: i32,
        shift_y: i32,
    ) -> Result<Self, TransformError> {
        let ctx = TransformContext::from_dimensions(dimensions, scale, shift_x, shift_y)?;
        let normalized = helper.normalize_batch(faces, &ctx)?;
        Ok(Self::new(view_tag, normalized))
    }

    pub fn view_tag(&self) -> i32 {
        self.view_tag
    }

    pub fn faces(&self) -> &[NormalizedFace] {
        &self.faces
    }

    /// coalescing_key is the number of faces, capped at `i16::MAX`.
    ///
    /// Events with different face counts must never replace one another.
    pub fn coalescing_key(&self) -> i16 {
        coalescing_key_for(self.faces.len())
    }

    pub fn serialize_event_data(&self) -> Result<Value, TransformError> {
        Ok(serde_json::to_value(self)?)
    }
}

pub fn coalescing_key_for(face_count: usize) -> i16 {
    i16::try_from(face_count).unwrap_or(i16::MAX)
}
