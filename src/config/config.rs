use std::fs;
use std::path::Path;
use anyhow::{bail, Context, Error};
use serde::{Deserialize, Serialize};
use crate::modules::faces_detected_event::EVENT_ON_FACES_DETECTED;

/// What to do with a landmark whose detector type has no canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkPolicy {
    /// Drop the landmark and log a warning.
    Skip,
    /// Reject the whole face.
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceEventConfig {
    pub event_name: String,
    pub landmark_policy: LandmarkPolicy,
    pub channel_capacity: usize,
}

impl FaceEventConfig {
    pub fn new() -> Self {
        FaceEventConfig {
            event_name: EVENT_ON_FACES_DETECTED.to_string(),
            landmark_policy: LandmarkPolicy::Skip,
            channel_capacity: 16,
        }
    }

    /// from_json_str parses a configuration, filling omitted fields with defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, Error> {
        let config: FaceEventConfig = serde_json::from_str(raw)
            .context("face_event_config - invalid configuration json")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("face_event_config - cannot read {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.event_name.trim().is_empty() {
            bail!("face_event_config - event name must not be empty")
        }
        if self.channel_capacity == 0 {
            bail!("face_event_config - channel capacity must be greater than zero")
        }
        Ok(())
    }
}

impl Default for FaceEventConfig {
    fn default() -> Self {
        Self::new()
    }
}
