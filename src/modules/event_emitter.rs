use anyhow::Error;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

/// An event as handed over to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub target: i32,
    pub name: String,
    pub coalescing_key: i16,
    pub payload: Value,
}

/// Boundary to the external event dispatcher.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn receive_event(&self, event: EmittedEvent) -> Result<(), Error>;
}

/// Forwards events over a bounded channel to whatever delivers them to listeners.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    sender: mpsc::Sender<EmittedEvent>,
}

impl ChannelEmitter {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<EmittedEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (ChannelEmitter { sender }, receiver)
    }
}

#[async_trait]
impl EventEmitter for ChannelEmitter {
    async fn receive_event(&self, event: EmittedEvent) -> Result<(), Error> {
        if let Err(err) = self.sender.send(event).await {
            let dropped = err.0;
            warn!(view_tag = dropped.target, name = %dropped.name, coalescing_key = dropped.coalescing_key, "dropping event, receiver is gone");
            return Err(Error::msg("channel_emitter - event receiver was dropped"));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::modules::event_emitter::{ChannelEmitter, EmittedEvent, EventEmitter};

    fn event(target: i32) -> EmittedEvent {
        EmittedEvent {
            target,
            name: "onFacesDetected".to_string(),
            coalescing_key: 0,
            payload: json!({"type": "face", "faces": [], "target": target}),
        }
    }

    #[tokio::test]
    async fn test_channel_emitter_forwards_in_order() {
        let (emitter, mut receiver) = ChannelEmitter::new(4);
        emitter.receive_event(event(1)).await.unwrap();
        emitter.receive_event(event(2)).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().target, 1);
        assert_eq!(receiver.recv().await.unwrap().target, 2);
    }

    #[tokio::test]
    async fn test_channel_emitter_closed_receiver() {
        let (emitter, receiver) = ChannelEmitter::new(1);
        drop(receiver);
        assert!(emitter.receive_event(event(1)).await.is_err());
    }
}
