//! Typed event bus for observing the bot.
//!
//! Uses a tokio broadcast channel so front ends and tests can watch what the
//! bot does without the bot knowing who is listening.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

/// Everything noteworthy the bot does.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A message went through the handler.
    MessageHandled {
        conversation: String,
        sender: String,
        was_command: bool,
    },
    /// A command or alias ran successfully.
    CommandRan {
        command: String,
        conversation: String,
    },
    /// A command or alias returned an error.
    CommandFailed {
        command: String,
        conversation: String,
        error: String,
    },
    /// A message was forwarded into a linked chat.
    MessageMirrored {
        from: String,
        to: String,
    },
    /// A message was scheduled for later replay.
    EventScheduled {
        fire_at: DateTime<Utc>,
        message: String,
    },
    /// A scheduled message was replayed.
    EventReplayed {
        message: String,
        conversation: String,
    },
    /// A due scheduled message was dropped without replaying.
    EventDiscarded {
        message: String,
        reason: String,
    },
    /// A tick's batch exceeded the flood threshold and was dropped.
    FloodDropped {
        count: usize,
    },
    /// A command asked the bot to stop.
    ExitRequested {
        code: i32,
    },
}

/// Application-wide event bus backed by a tokio broadcast channel.
///
/// Every subscriber gets every event. Slow subscribers that fall behind
/// receive a `Lagged` error and miss events.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AppEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to receive application events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Human-readable label for an event (for logging).
pub fn event_label(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::MessageHandled { .. } => "MessageHandled",
        AppEvent::CommandRan { .. } => "CommandRan",
        AppEvent::CommandFailed { .. } => "CommandFailed",
        AppEvent::MessageMirrored { .. } => "MessageMirrored",
        AppEvent::EventScheduled { .. } => "EventScheduled",
        AppEvent::EventReplayed { .. } => "EventReplayed",
        AppEvent::EventDiscarded { .. } => "EventDiscarded",
        AppEvent::FloodDropped { .. } => "FloodDropped",
        AppEvent::ExitRequested { .. } => "ExitRequested",
    }
}
