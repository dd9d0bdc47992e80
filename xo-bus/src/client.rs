//! The chat client surface.
//!
//! Everything the bot needs from the instant-messaging client goes through
//! `ChatClient`: resolving accounts and conversations, looking up buddies and
//! chat members, and sending text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use xo_core::error::XoResult;

/// Numeric account handle assigned by the chat client.
pub type AccountId = i64;

/// Numeric conversation handle assigned by the chat client.
pub type ConversationId = i64;

/// Whether a conversation is a one-on-one IM or a group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    Im,
    Chat,
}

impl std::fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Im => write!(f, "im"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

/// A message as delivered by the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub account: AccountId,
    pub sender: String,
    pub message: String,
    pub conversation: ConversationId,
    #[serde(default)]
    pub flags: u32,
}

/// The RPC surface of the external chat client.
///
/// Lookups return `None` (or an empty list) for unknown handles rather than
/// failing; only `send` reports errors.
pub trait ChatClient: Send + Sync {
    /// All account handles.
    fn accounts(&self) -> Vec<AccountId>;

    fn account_username(&self, account: AccountId) -> Option<String>;

    /// Display alias of the account, i.e. the bot's own name.
    fn account_alias(&self, account: AccountId) -> Option<String>;

    /// Protocol name such as `facebook` or `jabber`.
    fn account_protocol(&self, account: AccountId) -> Option<String>;

    /// All open conversation handles, possibly with duplicates per title.
    fn conversations(&self) -> Vec<ConversationId>;

    fn conversation_title(&self, conversation: ConversationId) -> Option<String>;

    /// Protocol-level conversation name.
    fn conversation_name(&self, conversation: ConversationId) -> Option<String>;

    fn conversation_account(&self, conversation: ConversationId) -> Option<AccountId>;

    fn conversation_kind(&self, conversation: ConversationId) -> Option<ConversationKind>;

    /// Alias of a buddy on an account. `None` when the buddy is unknown or has
    /// no alias.
    fn buddy_alias(&self, account: AccountId, name: &str) -> Option<String>;

    /// Member names of a group chat. Empty for IMs.
    fn chat_users(&self, conversation: ConversationId) -> Vec<String>;

    /// Send text to a conversation.
    fn send(&self, conversation: ConversationId, text: &str) -> XoResult<()>;

    /// Remove markup from message text.
    fn strip_html(&self, text: &str) -> String {
        strip_html(text)
    }
}

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Strip HTML tags and decode the handful of entities chat clients emit.
pub fn strip_html(text: &str) -> String {
    let text = LINE_BREAK.replace_all(text, "\n");
    let text = TAG.replace_all(&text, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<b>hi</b> there"), "hi there");
        assert_eq!(strip_html("a<br>b<BR/>c"), "a\nb\nc");
        assert_eq!(strip_html("1 &lt; 2 &amp;&amp; 3 &gt; 2"), "1 < 2 && 3 > 2");
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_incoming_message_flags_default() {
        let msg: IncomingMessage = serde_json::from_str(
            r#"{"account":1,"sender":"bob","message":"!ping","conversation":7}"#,
        )
        .unwrap();
        assert_eq!(msg.flags, 0);
        assert_eq!(msg.conversation, 7);
    }
}
