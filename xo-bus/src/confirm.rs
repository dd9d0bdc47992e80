//! Handoff queue between the pipe listener and the polling loop.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::client::IncomingMessage;

/// A received message waiting to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub received_at: DateTime<Utc>,
    pub message: IncomingMessage,
}

/// Mutex-guarded FIFO shared by one producer and one consumer.
///
/// Cloning shares the same queue.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationQueue {
    inner: Arc<Mutex<VecDeque<Confirmation>>>,
}

impl ConfirmationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message, stamped with the current time.
    pub fn push(&self, message: IncomingMessage) {
        self.push_at(message, Utc::now());
    }

    pub fn push_at(&self, message: IncomingMessage, received_at: DateTime<Utc>) {
        self.lock().push_back(Confirmation {
            received_at,
            message,
        });
    }

    /// Empty the queue, returning the messages received within `window` of
    /// `now` in arrival order. Older entries are dropped.
    pub fn drain_fresh(&self, now: DateTime<Utc>, window: Duration) -> Vec<IncomingMessage> {
        let drained: Vec<Confirmation> = self.lock().drain(..).collect();
        let total = drained.len();
        let fresh: Vec<IncomingMessage> = drained
            .into_iter()
            .filter(|c| now - c.received_at < window)
            .map(|c| c.message)
            .collect();
        let stale = total - fresh.len();
        if stale > 0 {
            warn!("dropped {stale} stale confirmation(s) older than {}s", window.num_seconds());
        }
        if !fresh.is_empty() {
            debug!("drained {} confirmation(s)", fresh.len());
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Confirmation>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            account: 1,
            sender: "ann".into(),
            message: text.into(),
            conversation: 7,
            flags: 0,
        }
    }

    #[test]
    fn test_drain_fresh_drops_stale() {
        let queue = ConfirmationQueue::new();
        let now = Utc::now();
        queue.push_at(message("old"), now - Duration::minutes(6));
        queue.push_at(message("first"), now - Duration::seconds(3));
        queue.push_at(message("second"), now);

        let fresh = queue.drain_fresh(now, Duration::minutes(5));
        let texts: Vec<&str> = fresh.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let producer = ConfirmationQueue::new();
        let consumer = producer.clone();
        producer.push(message("hello"));
        assert_eq!(consumer.len(), 1);
        let drained = consumer.drain_fresh(Utc::now() + Duration::seconds(1), Duration::minutes(5));
        assert_eq!(drained.len(), 1);
        assert!(producer.is_empty());
    }
}
