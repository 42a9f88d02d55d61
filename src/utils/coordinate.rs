use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::TransformError;

/// A point in output (view) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate2D {
    pub x: f64,
    pub y: f64,
}

impl Coordinate2D {
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate2D { x, y }
    }

    /// with_x returns a copy of the point with its horizontal component replaced.
    pub fn with_x(self, x: f64) -> Self {
        Coordinate2D { x, y: self.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

/// Bounding box of a face in output space, origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: Coordinate2D,
    pub size: Size2D,
}

/// The twelve facial landmarks reported by the detector.
///
/// Declaration order matches the detector's landmark constants, so the
/// numeric type `n` reported upstream corresponds to the `n`-th variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LandmarkType {
    #[serde(rename = "bottomMouthPosition")]
    BottomMouth,
    #[serde(rename = "leftCheekPosition")]
    LeftCheek,
    #[serde(rename = "leftEarPosition")]
    LeftEar,
    #[serde(rename = "leftEarTipPosition")]
    LeftEarTip,
    #[serde(rename = "leftEyePosition")]
    LeftEye,
    #[serde(rename = "leftMouthPosition")]
    LeftMouth,
    #[serde(rename = "noseBasePosition")]
    NoseBase,
    #[serde(rename = "rightCheekPosition")]
    RightCheek,
    #[serde(rename = "rightEarPosition")]
    RightEar,
    #[serde(rename = "rightEarTipPosition")]
    RightEarTip,
    #[serde(rename = "rightEyePosition")]
    RightEye,
    #[serde(rename = "rightMouthPosition")]
    RightMouth,
}

impl LandmarkType {
    pub const ALL: [LandmarkType; 12] = [
        LandmarkType::BottomMouth,
        LandmarkType::LeftCheek,
        LandmarkType::LeftEar,
        LandmarkType::LeftEarTip,
        LandmarkType::LeftEye,
        LandmarkType::LeftMouth,
        LandmarkType::NoseBase,
        LandmarkType::RightCheek,
        LandmarkType::RightEar,
        LandmarkType::RightEarTip,
        LandmarkType::RightEye,
        LandmarkType::RightMouth,
    ];

    /// name returns the key under which the landmark appears in a serialized face.
    pub fn name(self) -> &'static str {
        match self {
            LandmarkType::BottomMouth => "bottomMouthPosition",
            LandmarkType::LeftCheek => "leftCheekPosition",
            LandmarkType::LeftEar => "leftEarPosition",
            LandmarkType::LeftEarTip => "leftEarTipPosition",
            LandmarkType::LeftEye => "leftEyePosition",
            LandmarkType::LeftMouth => "leftMouthPosition",
            LandmarkType::NoseBase => "noseBasePosition",
            LandmarkType::RightCheek => "rightCheekPosition",
            LandmarkType::RightEar => "rightEarPosition",
            LandmarkType::RightEarTip => "rightEarTipPosition",
            LandmarkType::RightEye => "rightEyePosition",
            LandmarkType::RightMouth => "rightMouthPosition",
        }
    }
}

impl LandmarkType {
    /// from_name looks a landmark up by its serialized key.
    pub fn from_name(name: &str) -> Option<LandmarkType> {
        LandmarkType::ALL.iter().copied().find(|landmark| landmark.name() == name)
    }
}

impl TryFrom<i32> for LandmarkType {
    type Error = TransformError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| LandmarkType::ALL.get(idx).copied())
            .ok_or(TransformError::UnknownLandmark(value))
    }
}

impl fmt::Display for LandmarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Camera the frame was captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Selfie camera, preview is mirrored relative to the sensor.
    Front,
    Back,
}

/// Dimensions of the frame the detector ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
    /// Sensor rotation in degrees.
    pub rotation: i32,
    pub facing: Facing,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32, rotation: i32, facing: Facing) -> Self {
        ImageDimensions { width, height, rotation, facing }
    }

    pub fn is_landscape(&self) -> bool {
        self.rotation.rem_euclid(180) == 90
    }

    /// width returns the frame width as seen after rotation.
    pub fn width(&self) -> u32 {
        if self.is_landscape() { self.height } else { self.width }
    }

    pub fn height(&self) -> u32 {
        if self.is_landscape() { self.width } else { self.height }
    }
}
