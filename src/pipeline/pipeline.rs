use anyhow::{Context, Error};
use tracing::{debug, info};
use crate::config::config::FaceEventConfig;
use crate::helper::face_helper::{DetectedFace, FaceHelper};
use crate::modules::event_emitter::{EmittedEvent, EventEmitter};
use crate::modules::faces_detected_event::FacesDetectedEvent;
use crate::utils::coordinate::ImageDimensions;

#[derive(Debug, Clone)]
pub struct FaceEventPipeline<E: EventEmitter> {
    face_helper: FaceHelper,
    event_name: String,
    emitter: E,
}

impl<E: EventEmitter> FaceEventPipeline<E> {

    /// new initializes new instance of the pipeline
    pub fn new(config: FaceEventConfig, emitter: E) -> Result<Self, Error> {
        config.validate()?;
        info!(event_name = %config.event_name, landmark_policy = ?config.landmark_policy, "face event pipeline ready");
        Ok(FaceEventPipeline {
            face_helper: FaceHelper::new(config.landmark_policy),
            event_name: config.event_name,
            emitter,
        })
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// on_faces_detected normalizes one frame of detections and dispatches it to the view.
    ///
    /// A frame without faces is still dispatched so the view sees the count drop to zero.
    ///
    /// # Arguments
    /// * `view_tag` - target view
    /// * `faces` - detections of one frame
    /// * `dimensions` - frame dimensions
    /// * `scale` - source to view scale factor
    /// * `shift_x` - horizontal offset
    /// * `shift_y` - vertical offset
    ///
    /// # Returns
    /// * `Result<(), Error>`
    pub async fn on_faces_detected(
        &self,
        view_tag: i32,
        faces: &[DetectedFace],
        dimensions: ImageDimensions,
        scale: f64,
        shift_x: i32,
        shift_y: i32,
    ) -> Result<(), Error> {
        let event = FacesDetectedEvent::obtain(&self.face_helper, view_tag, faces, &dimensions, scale, shift_x, shift_y)
            .with_context(|| format!("face_event_pipeline - cannot normalize faces for view {view_tag}"))?;
        debug!(view_tag, faces = event.faces().len(), facing = ?dimensions.facing, "dispatching faces detected event");
        self.dispatch(event).await
    }

    async fn dispatch(&self, event: FacesDetectedEvent) -> Result<(), Error> {
        let emitted = EmittedEvent {
            target: event.view_tag(),
            name: self.event_name.clone(),
            coalescing_key: event.coalescing_key(),
            payload: event.serialize_event_data()?,
        };
        self.emitter.receive_event(emitted).await
    }
}
