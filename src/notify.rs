//! In-process fan-out of "tasks changed" notifications.
//!
//! Task mutation handlers publish a payload-free event; the SSE endpoint
//! streams it to connected clients, which are expected to re-fetch. There is
//! no subscription state beyond the live receivers.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Event published whenever a task is created, updated, or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TasksChanged;

/// Broadcast handle shared by mutation handlers and the SSE endpoint.
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<TasksChanged>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes a tasks-changed event. Never blocks; with no subscribers
    /// the event is dropped.
    pub fn tasks_changed(&self) {
        let _ = self.tx.send(TasksChanged);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TasksChanged> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_subscriber_receives_event() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();

        feed.tasks_changed();

        assert_eq!(rx.recv().await.unwrap(), TasksChanged);
    }

    #[actix_rt::test]
    async fn test_publish_without_subscribers_is_noop() {
        let feed = ChangeFeed::new();
        // Must neither block nor panic
        feed.tasks_changed();
    }

    #[actix_rt::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let feed = ChangeFeed::new();
        feed.tasks_changed();

        let mut rx = feed.subscribe();
        feed.tasks_changed();

        // Only the event published after subscribing arrives
        assert_eq!(rx.recv().await.unwrap(), TasksChanged);
        assert!(rx.try_recv().is_err());
    }
}
