//! Per-message arguments passed to every handler.

use xo_bus::{AccountId, ConversationId, IncomingMessage};

/// Who said what, where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    pub account: AccountId,
    /// Buddy name of the sender as the chat client reports it.
    pub sender: String,
    pub message: String,
    pub conversation: ConversationId,
    pub flags: u32,
}

impl MessageContext {
    pub fn new(
        account: AccountId,
        sender: impl Into<String>,
        message: impl Into<String>,
        conversation: ConversationId,
    ) -> Self {
        Self {
            account,
            sender: sender.into(),
            message: message.into(),
            conversation,
            flags: 0,
        }
    }

    /// Same context carrying different text.
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self.clone()
        }
    }

    /// Same context attributed to someone else.
    pub fn with_sender(&self, sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..self.clone()
        }
    }
}

impl From<IncomingMessage> for MessageContext {
    fn from(msg: IncomingMessage) -> Self {
        Self {
            account: msg.account,
            sender: msg.sender,
            message: msg.message,
            conversation: msg.conversation,
            flags: msg.flags,
        }
    }
}

impl std::fmt::Display for MessageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {:?}, {:?}, {}, {})",
            self.account, self.sender, self.message, self.conversation, self.flags
        )
    }
}
