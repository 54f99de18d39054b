//! In-process fan-out of dashboard events to WebSocket sessions.
//!
//! Handlers and the report consumer publish; every open socket holds a
//! receiver. Slow sockets lag and skip events instead of blocking writers.

use tokio::sync::broadcast;

use crate::models::{WsEvent, WsEventMessage};

/// Events buffered per receiver before it starts lagging.
const EVENT_BUFFER: usize = 256;

#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<WsEventMessage>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUFFER)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WsEventMessage> {
        self.sender.subscribe()
    }

    /// Number of open receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Timestamp `event` and hand it to every receiver. Returns how many
    /// got it; zero when nobody is listening.
    pub fn publish(&self, event: WsEvent) -> usize {
        self.sender.send(WsEventMessage::new(event)).unwrap_or(0)
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_socket_receives_event() {
        let broadcaster = EventBroadcaster::new();

        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        let count = broadcaster.publish(WsEvent::notifications_read(Some(vec![1, 2]), 2));
        assert_eq!(count, 2);

        assert!(rx1.recv().await.is_ok());
        let received = rx2.recv().await.unwrap();
        assert!(matches!(received.event, WsEvent::NotificationsChanged(ref p) if p.affected == 2));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let broadcaster = EventBroadcaster::new();
        assert_eq!(broadcaster.subscriber_count(), 0);
        assert_eq!(broadcaster.publish(WsEvent::notifications_deleted(None, 0)), 0);
    }
}
