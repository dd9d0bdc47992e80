//! Scheduled events.
//!
//! An event is a message to replay through the normal message handler at a
//! later time, as though the original sender had just typed it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enough of the original message to replay it later.
///
/// Accounts and conversations are stored by username and title because the
/// chat client renumbers them on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayMessage {
    pub account: String,
    pub sender: String,
    pub message: String,
    pub conversation: String,
    #[serde(default)]
    pub flags: u32,
}

/// A message scheduled to be replayed at `fire_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: Uuid,
    #[serde(with = "crate::datefmt")]
    pub fire_at: DateTime<Utc>,
    pub replay: ReplayMessage,
}

impl ScheduledEvent {
    pub fn new(fire_at: DateTime<Utc>, replay: ReplayMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            fire_at,
            replay,
        }
    }

    /// Whether the fire time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.fire_at < now
    }
}

/// The ordered list of pending events. Indexes are what users see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventQueue {
    events: Vec<ScheduledEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: ScheduledEvent) {
        self.events.push(event);
    }

    pub fn get(&self, index: usize) -> Option<&ScheduledEvent> {
        self.events.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<ScheduledEvent> {
        if index < self.events.len() {
            Some(self.events.remove(index))
        } else {
            None
        }
    }

    /// Remove and return every event that is due, preserving order.
    pub fn split_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledEvent> {
        let (due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.events).into_iter().partition(|e| e.is_due(now));
        self.events = pending;
        due
    }

    /// `(index, event)` pairs in queue order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ScheduledEvent)> {
        self.events.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn replay(message: &str) -> ReplayMessage {
        ReplayMessage {
            account: "bot@example.com".into(),
            sender: "ann".into(),
            message: message.into(),
            conversation: "Dorm".into(),
            flags: 0,
        }
    }

    #[test]
    fn test_split_due_keeps_future_events() {
        let now = Utc.with_ymd_and_hms(2019, 6, 1, 9, 0, 0).unwrap();
        let mut queue = EventQueue::default();
        queue.push(ScheduledEvent::new(now - Duration::seconds(1), replay("!ping")));
        queue.push(ScheduledEvent::new(now + Duration::minutes(5), replay("!echo later")));
        queue.push(ScheduledEvent::new(now - Duration::hours(2), replay("!echo stale")));

        let due = queue.split_due(now);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].replay.message, "!ping");
        assert_eq!(due[1].replay.message, "!echo stale");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(0).unwrap().replay.message, "!echo later");
    }

    #[test]
    fn test_event_at_exact_now_is_not_due() {
        let now = Utc.with_ymd_and_hms(2019, 6, 1, 9, 0, 0).unwrap();
        let event = ScheduledEvent::new(now, replay("!ping"));
        assert!(!event.is_due(now));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut queue = EventQueue::default();
        assert!(queue.remove(0).is_none());
        queue.push(ScheduledEvent::new(Utc::now(), replay("!ping")));
        assert!(queue.remove(3).is_none());
        assert!(queue.remove(0).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_serialized_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2019, 6, 1, 9, 0, 0).unwrap();
        let event = ScheduledEvent::new(at, replay("!ping"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["fire_at"], "Sat, 01 Jun 2019 09:00:00 UTC");
        let back: ScheduledEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
