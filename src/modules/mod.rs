pub mod event_emitter;
pub mod faces_detected_event;
