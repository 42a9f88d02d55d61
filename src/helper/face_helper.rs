use std::collections::BTreeMap;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use crate::config::config::LandmarkPolicy;
use crate::error::TransformError;
use crate::utils::coordinate::{Bounds, Coordinate2D, Facing, ImageDimensions, LandmarkType, Size2D};

/// A single landmark as reported by the detector, `landmark_type` being the raw detector constant.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLandmark {
    pub landmark_type: i32,
    pub position: Point2<f32>,
}

/// A face as reported by the detector, in source image pixel space.
///
/// Probabilities are negative when the detector did not compute them.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub id: i32,
    pub roll_angle: f32,
    pub yaw_angle: f32,
    pub smiling_probability: f32,
    pub left_eye_open_probability: f32,
    pub right_eye_open_probability: f32,
    pub landmarks: Vec<DetectedLandmark>,
    pub position: Point2<f32>,
    pub width: f32,
    pub height: f32,
}

/// Scale, shift and facing used to bring a detected face into view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    scale: f64,
    shift_x: i32,
    shift_y: i32,
    source_width: u32,
    facing: Facing,
}

impl TransformContext {
    pub fn new(scale: f64, shift_x: i32, shift_y: i32, source_width: u32, facing: Facing) -> Result<Self, TransformError> {
        validate_scale(scale)?;
        Ok(TransformContext { scale, shift_x, shift_y, source_width, facing })
    }

    /// from_dimensions takes the source width and facing from the frame the faces were detected on.
    pub fn from_dimensions(dimensions: &ImageDimensions, scale: f64, shift_x: i32, shift_y: i32) -> Result<Self, TransformError> {
        Self::new(scale, shift_x, shift_y, dimensions.width(), dimensions.facing)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn shift_x(&self) -> i32 {
        self.shift_x
    }

    pub fn shift_y(&self) -> i32 {
        self.shift_y
    }

    pub fn source_width(&self) -> u32 {
        self.source_width
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }
}

const FACE_FIELDS: [&str; 7] = [
    "faceID",
    "rollAngle",
    "yawAngle",
    "smilingProbability",
    "leftEyeOpenProbability",
    "rightEyeOpenProbability",
    "bounds",
];

/// A face in view space, ready to be put into an event payload.
///
/// Records are never modified: every transform consumes one and builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFace {
    #[serde(rename = "faceID")]
    face_id: i32,
    roll_angle: f64,
    yaw_angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    smiling_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    left_eye_open_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right_eye_open_probability: Option<f64>,
    #[serde(flatten)]
    landmarks: BTreeMap<LandmarkType, Coordinate2D>,
    bounds: Bounds,
    #[serde(skip)]
    facing_applied: Option<Facing>,
}

impl NormalizedFace {
    /// from_payload rebuilds a face from its serialized form.
    ///
    /// The format is strict: every key must be a face field or a landmark name.
    /// The result counts as freshly serialized: no facing step is recorded on it.
    pub fn from_payload(payload: Value) -> Result<Self, TransformError> {
        let map = match payload.as_object() {
            Some(map) if map.get("bounds").map_or(false, Value::is_object) => map,
            _ => {
                return Err(TransformError::PreconditionViolation(
                    "serialized face has no bounds".to_string(),
                ))
            }
        };
        if let Some(key) = map
            .keys()
            .find(|key| !FACE_FIELDS.contains(&key.as_str()) && LandmarkType::from_name(key).is_none())
        {
            return Err(TransformError::UnknownField(key.clone()));
        }
        Ok(serde_json::from_value(payload)?)
    }

    pub fn face_id(&self) -> i32 {
        self.face_id
    }

    pub fn roll_angle(&self) -> f64 {
        self.roll_angle
    }

    pub fn yaw_angle(&self) -> f64 {
        self.yaw_angle
    }

    pub fn smiling_probability(&self) -> Option<f64> {
        self.smiling_probability
    }

    pub fn left_eye_open_probability(&self) -> Option<f64> {
        self.left_eye_open_probability
    }

    pub fn right_eye_open_probability(&self) -> Option<f64> {
        self.right_eye_open_probability
    }

    pub fn landmark(&self, landmark_type: LandmarkType) -> Option<Coordinate2D> {
        self.landmarks.get(&landmark_type).copied()
    }

    pub fn landmarks(&self) -> &BTreeMap<LandmarkType, Coordinate2D> {
        &self.landmarks
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// facing_applied reports which facing step, if any, has already run on this record.
    pub fn facing_applied(&self) -> Option<Facing> {
        self.facing_applied
    }

    fn ensure_finite(self) -> Result<Self, TransformError> {
        let origin = self.bounds.origin;
        let size = self.bounds.size;
        let bounds_finite = [origin.x, origin.y, size.width, size.height].iter().all(|v| v.is_finite());
        if !bounds_finite {
            return Err(TransformError::InvalidTransform(format!(
                "face {} has non-finite bounds {:?}",
                self.face_id, self.bounds
            )));
        }
        if let Some((landmark_type, position)) = self
            .landmarks
            .iter()
            .find(|(_, position)| !(position.x.is_finite() && position.y.is_finite()))
        {
            return Err(TransformError::InvalidTransform(format!(
                "face {} has non-finite {} {:?}",
                self.face_id, landmark_type, position
            )));
        }
        Ok(self)
    }

    fn ensure_unoriented(&self, operation: &str) -> Result<(), TransformError> {
        match self.facing_applied {
            None => Ok(()),
            Some(applied) => Err(TransformError::PreconditionViolation(format!(
                "{operation} on face {} which already had its {:?} facing step applied",
                self.face_id, applied
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FaceHelper {
    landmark_policy: LandmarkPolicy,
}

impl FaceHelper {

    /// new initializes new instance of face helper with the given policy for unrecognized landmarks.
    pub fn new(landmark_policy: LandmarkPolicy) -> Self {
        FaceHelper { landmark_policy }
    }

    /// serialize_face converts a detected face into view space, without any facing step.
    ///
    /// # Arguments
    /// * `face` - face as reported by the detector
    /// * `scale` - source to view scale factor, must be positive
    /// * `shift_x` - horizontal offset subtracted before scaling
    /// * `shift_y` - vertical offset subtracted before scaling
    ///
    /// # Returns
    /// * `Result<NormalizedFace, TransformError>`
    pub fn serialize_face(&self, face: &DetectedFace, scale: f64, shift_x: i32, shift_y: i32) -> Result<NormalizedFace, TransformError> {
        validate_scale(scale)?;

        let mut landmarks: BTreeMap<LandmarkType, Coordinate2D> = BTreeMap::new();
        for landmark in &face.landmarks {
            match LandmarkType::try_from(landmark.landmark_type) {
                Ok(landmark_type) => {
                    landmarks.insert(landmark_type, map_from_point(&landmark.position, scale, shift_x, shift_y));
                }
                Err(err) => match self.landmark_policy {
                    LandmarkPolicy::Skip => {
                        warn!(face_id = face.id, landmark_type = landmark.landmark_type, "skipping unrecognized landmark");
                    }
                    LandmarkPolicy::Fail => return Err(err),
                },
            }
        }

        NormalizedFace {
            face_id: face.id,
            roll_angle: face.roll_angle as f64,
            yaw_angle: face.yaw_angle as f64,
            smiling_probability: probability(face.smiling_probability),
            left_eye_open_probability: probability(face.left_eye_open_probability),
            right_eye_open_probability: probability(face.right_eye_open_probability),
            landmarks,
            bounds: Bounds {
                origin: map_from_point(&face.position, scale, shift_x, shift_y),
                size: Size2D {
                    width: face.width as f64 * scale,
                    height: face.height as f64 * scale,
                },
            },
            facing_applied: None,
        }
        .ensure_finite()
    }

    pub fn serialize_face_unscaled(&self, face: &DetectedFace) -> Result<NormalizedFace, TransformError> {
        self.serialize_face(face, 1.0, 0, 0)
    }

    /// normalize_face serializes the face and then applies exactly one facing step:
    /// mirroring for the front camera, angle inversion for the back camera.
    pub fn normalize_face(&self, face: &DetectedFace, ctx: &TransformContext) -> Result<NormalizedFace, TransformError> {
        let serialized = self.serialize_face(face, ctx.scale(), ctx.shift_x(), ctx.shift_y())?;
        match ctx.facing() {
            Facing::Front => mirror_horizontally(serialized, ctx.source_width(), ctx.scale()),
            Facing::Back => invert_angles(serialized),
        }
    }

    /// normalize_batch normalizes every face of a frame, keeping input order.
    pub fn normalize_batch(&self, faces: &[DetectedFace], ctx: &TransformContext) -> Result<Vec<NormalizedFace>, TransformError> {
        faces.iter().map(|face| self.normalize_face(face, ctx)).collect()
    }
}

impl Default for FaceHelper {
    fn default() -> Self {
        Self::new(LandmarkPolicy::Skip)
    }
}

/// mirror_horizontally reflects a serialized face about the vertical midline of the source image.
///
/// The box origin is moved back to the top-left corner of the reflected box.
/// Landmarks are reflected as plain points. Must run at most once per face.
pub fn mirror_horizontally(face: NormalizedFace, source_width: u32, scale: f64) -> Result<NormalizedFace, TransformError> {
    validate_scale(scale)?;
    face.ensure_unoriented("mirror_horizontally")?;

    let mirrored_origin = position_mirrored_horizontally(face.bounds.origin, source_width, scale);
    let origin = position_translated_horizontally(mirrored_origin, -face.bounds.size.width);

    let landmarks = face
        .landmarks
        .iter()
        .map(|(landmark_type, position)| {
            (*landmark_type, position_mirrored_horizontally(*position, source_width, scale))
        })
        .collect();

    NormalizedFace {
        landmarks,
        bounds: Bounds { origin, size: face.bounds.size },
        facing_applied: Some(Facing::Front),
        ..face
    }
    .ensure_finite()
}

/// invert_angles flips the rotation direction of roll and yaw, leaving geometry untouched.
pub fn invert_angles(face: NormalizedFace) -> Result<NormalizedFace, TransformError> {
    face.ensure_unoriented("invert_angles")?;

    Ok(NormalizedFace {
        roll_angle: inverted_angle(face.roll_angle),
        yaw_angle: inverted_angle(face.yaw_angle),
        facing_applied: Some(Facing::Back),
        ..face
    })
}

/// inverted_angle returns `(360 - angle) mod 360`, always in `[0, 360)`.
pub fn inverted_angle(angle: f64) -> f64 {
    (360.0 - angle).rem_euclid(360.0)
}

pub fn value_mirrored_horizontally(element_x: f64, container_width: u32, scale: f64) -> f64 {
    let original_x = element_x / scale;
    let mirrored_x = container_width as f64 - original_x;
    mirrored_x * scale
}

pub fn position_mirrored_horizontally(position: Coordinate2D, container_width: u32, scale: f64) -> Coordinate2D {
    position.with_x(value_mirrored_horizontally(position.x, container_width, scale))
}

pub fn position_translated_horizontally(position: Coordinate2D, translate_x: f64) -> Coordinate2D {
    position.with_x(position.x + translate_x)
}

pub fn map_from_point(point: &Point2<f32>, scale: f64, shift_x: i32, shift_y: i32) -> Coordinate2D {
    Coordinate2D {
        x: (point.x as f64 - shift_x as f64) * scale,
        y: (point.y as f64 - shift_y as f64) * scale,
    }
}

fn probability(value: f32) -> Option<f64> {
    if value >= 0.0 {
        Some(value as f64)
    } else {
        None
    }
}

fn validate_scale(scale: f64) -> Result<(), TransformError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(TransformError::InvalidTransform(format!("scale must be a positive finite number, got {scale}")))
    }
}
