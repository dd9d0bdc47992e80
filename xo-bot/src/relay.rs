//! Sending text and forwarding it across linked chats.

use tracing::{info, warn};

use xo_bus::ConversationId;
use xo_core::constants::{protocols, TRANSCRIPT_TARGET};
use xo_core::error::XoResult;

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::event_bus::AppEvent;

/// Render `text` attributed to `nick` for a conversation on `protocol`.
///
/// Facebook gets `*nick*`, everything else `<b>nick</b>`. A nick that
/// starts with the command delimiter is prefixed with `_` so the receiving
/// side does not run it as a command.
pub fn format_outgoing(protocol: &str, delimiter: &str, nick: &str, text: &str) -> String {
    let body = text.replace('\n', "<br>");
    if nick.is_empty() {
        return body;
    }
    let (open, close) = if protocol.eq_ignore_ascii_case(protocols::FACEBOOK) {
        ("*", "*")
    } else {
        ("<b>", "</b>")
    };
    let guard = if !delimiter.is_empty() && nick.starts_with(delimiter) {
        "_"
    } else {
        ""
    };
    format!("{guard}{open}{nick}{close}: {body}")
}

impl Bot {
    /// Send `text` into `receiving`, attributed to `nick` (empty for none).
    /// Nothing happens when there is no receiving conversation.
    pub fn send_message(
        &self,
        sending: ConversationId,
        receiving: Option<ConversationId>,
        nick: &str,
        text: &str,
    ) -> XoResult<()> {
        let Some(receiving) = receiving else {
            return Ok(());
        };
        let protocol = self
            .client
            .conversation_account(receiving)
            .and_then(|account| self.client.account_protocol(account))
            .unwrap_or_default();
        let outgoing = format_outgoing(&protocol, &self.config.command_delimiter, nick, text);
        self.client.send(receiving, &outgoing)?;

        let shown = if nick.is_empty() {
            text.to_string()
        } else {
            format!("{nick}: {text}")
        };
        info!(
            target: TRANSCRIPT_TARGET,
            "Sent {shown:?} from {} ({sending}) to {} ({receiving}).",
            self.chat_title(sending),
            self.chat_title(receiving),
        );
        Ok(())
    }

    /// Answer in the conversation the message came from, and forward the
    /// answer to linked chats as the bot.
    pub fn reply(&self, ctx: &MessageContext, text: &str) -> XoResult<()> {
        self.send_message(ctx.conversation, Some(ctx.conversation), "", text)?;

        let alias = self.client.account_alias(ctx.account).unwrap_or_default();
        for target in self.resolver().linked_conversations(ctx.conversation) {
            if let Err(e) = self.send_message(ctx.conversation, Some(target), &alias, text) {
                warn!("failed to forward reply to {target}: {e}");
            }
        }
        Ok(())
    }

    /// Forward a live message from `ctx`'s conversation to every linked chat.
    pub fn mirror(&self, ctx: &MessageContext, nick: &str, text: &str) {
        let from = self.chat_title(ctx.conversation);
        for target in self.resolver().linked_conversations(ctx.conversation) {
            match self.send_message(ctx.conversation, Some(target), nick, text) {
                Ok(()) => self.bus.emit(AppEvent::MessageMirrored {
                    from: from.clone(),
                    to: self.chat_title(target),
                }),
                Err(e) => warn!("failed to mirror {from} into {target}: {e}"),
            }
        }
    }
}
