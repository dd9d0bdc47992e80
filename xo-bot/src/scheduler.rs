//! Scheduled commands: storing them and replaying them when due.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use xo_core::error::{XoError, XoResult};
use xo_store::{ReplayMessage, ScheduledEvent};

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::event_bus::AppEvent;
use crate::text::natural_delta;
use crate::timeparse::parse_time;

impl Bot {
    /// Schedule `command_text` to be replayed as if `ctx`'s sender typed it
    /// at `time_text`. Returns the fire time.
    pub fn schedule(
        &mut self,
        ctx: &MessageContext,
        time_text: &str,
        command_text: &str,
    ) -> XoResult<DateTime<Utc>> {
        let now = self.now().with_timezone(&Local);
        let fire_at = parse_time(time_text, now)
            .ok_or_else(|| XoError::TimeParse(time_text.trim().to_string()))?
            .with_timezone(&Utc);
        let account = self
            .client
            .account_username(ctx.account)
            .ok_or_else(|| XoError::AccountNotFound(ctx.account.to_string()))?;

        let replay = ReplayMessage {
            account,
            sender: ctx.sender.clone(),
            message: command_text.to_string(),
            conversation: self.chat_title(ctx.conversation),
            flags: ctx.flags,
        };
        info!("scheduled {:?} for {fire_at} in {}", replay.message, replay.conversation);
        self.state.events.push(ScheduledEvent::new(fire_at, replay));
        self.state.save_events()?;

        self.bus.emit(AppEvent::EventScheduled {
            fire_at,
            message: command_text.to_string(),
        });
        Ok(fire_at)
    }

    /// Replay every event whose time has passed, as long as it is not older
    /// than the replay threshold. Due events are removed either way.
    pub fn process_due(&mut self, now: DateTime<Utc>) {
        let due = self.state.events.split_due(now);
        if due.is_empty() {
            return;
        }
        let threshold = chrono::Duration::from_std(self.config.replay_threshold())
            .unwrap_or_else(|_| chrono::Duration::zero());

        for event in due {
            let late = now - event.fire_at;
            if late >= threshold {
                debug!("discarding {:?}, {} late", event.replay.message, natural_delta(late));
                self.bus.emit(AppEvent::EventDiscarded {
                    message: event.replay.message.clone(),
                    reason: format!("{} late", natural_delta(late)),
                });
                continue;
            }

            match self.replay_context(&event.replay) {
                Ok(ctx) => {
                    self.bus.emit(AppEvent::EventReplayed {
                        message: ctx.message.clone(),
                        conversation: event.replay.conversation.clone(),
                    });
                    self.handle_message(&ctx);
                }
                Err(e) => {
                    warn!("cannot replay {:?}: {e}", event.replay.message);
                    self.bus.emit(AppEvent::EventDiscarded {
                        message: event.replay.message.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if let Err(e) = self.state.save_events() {
            warn!("failed to save scheduled events: {e}");
        }
    }

    /// Rebuild a message context from a stored replay, looking the account
    /// and conversation up again.
    fn replay_context(&self, replay: &ReplayMessage) -> XoResult<MessageContext> {
        let account = self
            .client
            .accounts()
            .into_iter()
            .find(|id| self.client.account_username(*id).as_deref() == Some(replay.account.as_str()))
            .ok_or_else(|| XoError::AccountNotFound(replay.account.clone()))?;
        let conversation = self
            .resolver()
            .conversation_by_title(&replay.conversation)
            .ok_or_else(|| XoError::ConversationNotFound(replay.conversation.clone()))?;

        Ok(MessageContext {
            account,
            sender: replay.sender.clone(),
            message: replay.message.clone(),
            conversation,
            flags: replay.flags,
        })
    }
}
