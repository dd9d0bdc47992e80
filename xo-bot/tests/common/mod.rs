//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use xo_bot::{Bot, EventBus, MessageContext, Service};
use xo_bus::{ConversationId, ConversationKind, MemoryClient, SentMessage};
use xo_core::config::BotConfig;
use xo_store::{BotState, Store};

pub const JABBER: i64 = 1;
pub const FACEBOOK: i64 = 2;

pub const DORM: ConversationId = 7;
pub const LAB: ConversationId = 8;
pub const FAMILY: ConversationId = 9;

/// A bot wired to an in-memory client and a temporary state directory.
///
/// Holds the TempDir so the state files live as long as the harness.
pub struct Harness {
    pub bot: Bot,
    pub client: Arc<MemoryClient>,
    pub bus: EventBus,
    pub dir: TempDir,
}

/// The frozen "now" every harness starts at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 14, 15, 9, 26).unwrap()
}

/// Create a client with two accounts and three chats.
///
/// - Dorm (jabber): ann, bob and the bot
/// - Lab (jabber): carl
/// - Family (facebook): dan
pub fn create_test_client() -> Arc<MemoryClient> {
    let client = Arc::new(MemoryClient::new());
    client
        .add_account(JABBER, "bot@example.com", "Relay", "jabber")
        .add_account(FACEBOOK, "relay.bot", "Relay", "facebook")
        .add_conversation(DORM, JABBER, "Dorm", ConversationKind::Chat)
        .add_conversation(LAB, JABBER, "Lab", ConversationKind::Chat)
        .add_conversation(FAMILY, FACEBOOK, "Family", ConversationKind::Chat)
        .add_buddy(JABBER, "ann", Some("Ann Smith"))
        .add_buddy(JABBER, "bob", Some("Bob Jones"))
        .add_buddy(JABBER, "carl", None)
        .add_buddy(FACEBOOK, "dan", Some("Dan Brown"))
        .set_chat_users(DORM, &["ann", "bob", "bot@example.com"])
        .set_chat_users(LAB, &["carl"])
        .set_chat_users(FAMILY, &["dan"]);
    client
}

/// Create a started bot with a frozen clock and a seeded rng.
pub fn create_test_harness() -> Harness {
    let dir = TempDir::new().expect("failed to create temp dir");
    harness_in(dir, BotConfig::default())
}

/// Same as `create_test_harness`, reusing an existing state directory.
pub fn harness_in(dir: TempDir, config: BotConfig) -> Harness {
    let client = create_test_client();
    let store = Store::open(dir.path()).expect("failed to open store");
    let bus = EventBus::new(64);
    let mut bot = Bot::new(client.clone(), store, config, bus.clone());
    bot.freeze_clock(now());
    bot.seed_rng(42);
    bot.init().expect("failed to start bot");
    Harness {
        bot,
        client,
        bus,
        dir,
    }
}

impl Harness {
    /// Handle `text` from `sender` in `conversation` and return everything
    /// the bot sent, in order.
    pub fn say_all(
        &mut self,
        conversation: ConversationId,
        sender: &str,
        text: &str,
    ) -> Vec<SentMessage> {
        let account = self
            .client
            .directory()
            .conversation(conversation)
            .map(|c| c.account)
            .unwrap_or(JABBER);
        self.client.take_sent();
        self.bot
            .handle_message(&MessageContext::new(account, sender, text, conversation));
        self.client.take_sent()
    }

    /// Handle `text` and return what was sent back into the same chat.
    pub fn say(&mut self, conversation: ConversationId, sender: &str, text: &str) -> Vec<String> {
        texts_in(&self.say_all(conversation, sender, text), conversation)
    }

    /// Move the frozen clock forward.
    pub fn advance(&mut self, by: Duration) -> DateTime<Utc> {
        let at = self.bot.now() + by;
        self.bot.freeze_clock(at);
        at
    }

    /// State as it is on disk right now.
    pub fn reload_state(&self) -> BotState {
        BotState::load(Store::open(self.dir.path()).expect("failed to open store"))
    }

    /// Link `source` to `targets` directly, bypassing the link command.
    pub fn link(&mut self, source: &str, targets: &[&str]) {
        self.bot
            .persisted_mut()
            .links
            .link(source, targets.iter().map(|t| t.to_string()));
    }
}

/// Texts of the messages sent into `conversation`.
pub fn texts_in(sent: &[SentMessage], conversation: ConversationId) -> Vec<String> {
    sent.iter()
        .filter(|m| m.conversation == conversation)
        .map(|m| m.text.clone())
        .collect()
}
