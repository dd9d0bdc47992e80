//! In-process chat client.
//!
//! Answers lookups from a `Directory` built up with the builder methods and
//! records everything sent instead of delivering it. The console front end
//! and the test suites drive the bot through this.

use std::sync::{Mutex, RwLock};

use xo_core::error::{XoError, XoResult};

use crate::client::{AccountId, ChatClient, ConversationId, ConversationKind};
use crate::directory::{AccountInfo, BuddyInfo, ConversationInfo, Directory};

/// A message the bot sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub conversation: ConversationId,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct MemoryClient {
    directory: RwLock<Directory>,
    outbox: Mutex<Vec<SentMessage>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(directory: Directory) -> Self {
        Self {
            directory: RwLock::new(directory),
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn add_account(&self, id: AccountId, username: &str, alias: &str, protocol: &str) -> &Self {
        self.write().upsert_account(AccountInfo {
            id,
            username: username.to_string(),
            alias: alias.to_string(),
            protocol: protocol.to_string(),
        });
        self
    }

    pub fn add_conversation(
        &self,
        id: ConversationId,
        account: AccountId,
        title: &str,
        kind: ConversationKind,
    ) -> &Self {
        self.write().upsert_conversation(ConversationInfo {
            id,
            account,
            title: title.to_string(),
            name: None,
            kind,
        });
        self
    }

    pub fn add_buddy(&self, account: AccountId, name: &str, alias: Option<&str>) -> &Self {
        self.write().upsert_buddy(BuddyInfo {
            account,
            name: name.to_string(),
            alias: alias.map(str::to_string),
        });
        self
    }

    pub fn set_chat_users(&self, conversation: ConversationId, users: &[&str]) -> &Self {
        self.write()
            .set_users(conversation, users.iter().map(|u| u.to_string()).collect());
        self
    }

    /// Copy of the current directory.
    pub fn directory(&self) -> Directory {
        self.read().clone()
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox_lock().clone()
    }

    /// Everything sent so far, clearing the outbox.
    pub fn take_sent(&self) -> Vec<SentMessage> {
        std::mem::take(&mut *self.outbox_lock())
    }

    /// Texts sent to one conversation.
    pub fn sent_to(&self, conversation: ConversationId) -> Vec<String> {
        self.outbox_lock()
            .iter()
            .filter(|m| m.conversation == conversation)
            .map(|m| m.text.clone())
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Directory> {
        self.directory.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Directory> {
        self.directory.write().unwrap_or_else(|e| e.into_inner())
    }

    fn outbox_lock(&self) -> std::sync::MutexGuard<'_, Vec<SentMessage>> {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChatClient for MemoryClient {
    fn accounts(&self) -> Vec<AccountId> {
        self.read().accounts.iter().map(|a| a.id).collect()
    }

    fn account_username(&self, account: AccountId) -> Option<String> {
        self.read().account(account).map(|a| a.username.clone())
    }

    fn account_alias(&self, account: AccountId) -> Option<String> {
        self.read().account(account).map(|a| a.alias.clone())
    }

    fn account_protocol(&self, account: AccountId) -> Option<String> {
        self.read().account(account).map(|a| a.protocol.clone())
    }

    fn conversations(&self) -> Vec<ConversationId> {
        self.read().conversations.iter().map(|c| c.id).collect()
    }

    fn conversation_title(&self, conversation: ConversationId) -> Option<String> {
        self.read().conversation(conversation).map(|c| c.title.clone())
    }

    fn conversation_name(&self, conversation: ConversationId) -> Option<String> {
        self.read()
            .conversation(conversation)
            .map(|c| c.name.clone().unwrap_or_else(|| c.title.clone()))
    }

    fn conversation_account(&self, conversation: ConversationId) -> Option<AccountId> {
        self.read().conversation(conversation).map(|c| c.account)
    }

    fn conversation_kind(&self, conversation: ConversationId) -> Option<ConversationKind> {
        self.read().conversation(conversation).map(|c| c.kind)
    }

    fn buddy_alias(&self, account: AccountId, name: &str) -> Option<String> {
        self.read().buddy(account, name).and_then(|b| b.alias.clone())
    }

    fn chat_users(&self, conversation: ConversationId) -> Vec<String> {
        self.read().users(conversation)
    }

    fn send(&self, conversation: ConversationId, text: &str) -> XoResult<()> {
        if self.read().conversation(conversation).is_none() {
            return Err(XoError::ConversationNotFound(conversation.to_string()));
        }
        self.outbox_lock().push(SentMessage {
            conversation,
            text: text.to_string(),
        });
        Ok(())
    }
}
