//! Snapshot of what the chat client knows about.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::{AccountId, ConversationId, ConversationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: AccountId,
    pub username: String,
    pub alias: String,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationInfo {
    pub id: ConversationId,
    pub account: AccountId,
    pub title: String,
    /// Protocol-level name; falls back to the title when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub kind: ConversationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuddyInfo {
    pub account: AccountId,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

/// Accounts, conversations, buddies and chat members.
///
/// Both concrete clients answer their lookups from one of these. The pipe
/// bridge sends a fresh copy whenever the client's view changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub accounts: Vec<AccountInfo>,
    #[serde(default)]
    pub conversations: Vec<ConversationInfo>,
    #[serde(default)]
    pub buddies: Vec<BuddyInfo>,
    /// Conversation id to member names.
    #[serde(default)]
    pub users: BTreeMap<ConversationId, Vec<String>>,
}

impl Directory {
    pub fn account(&self, id: AccountId) -> Option<&AccountInfo> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn conversation(&self, id: ConversationId) -> Option<&ConversationInfo> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn buddy(&self, account: AccountId, name: &str) -> Option<&BuddyInfo> {
        self.buddies
            .iter()
            .find(|b| b.account == account && b.name == name)
    }

    pub fn users(&self, conversation: ConversationId) -> Vec<String> {
        self.users.get(&conversation).cloned().unwrap_or_default()
    }

    /// Add or replace an account by id.
    pub fn upsert_account(&mut self, account: AccountInfo) {
        match self.accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
    }

    /// Add or replace a conversation by id.
    pub fn upsert_conversation(&mut self, conversation: ConversationInfo) {
        match self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation.id)
        {
            Some(existing) => *existing = conversation,
            None => self.conversations.push(conversation),
        }
    }

    /// Add or replace a buddy by (account, name).
    pub fn upsert_buddy(&mut self, buddy: BuddyInfo) {
        match self
            .buddies
            .iter_mut()
            .find(|b| b.account == buddy.account && b.name == buddy.name)
        {
            Some(existing) => *existing = buddy,
            None => self.buddies.push(buddy),
        }
    }

    pub fn set_users(&mut self, conversation: ConversationId, users: Vec<String>) {
        self.users.insert(conversation, users);
    }

    /// Fold another snapshot into this one. Entries in `other` win.
    pub fn merge(&mut self, other: Directory) {
        for account in other.accounts {
            self.upsert_account(account);
        }
        for conversation in other.conversations {
            self.upsert_conversation(conversation);
        }
        for buddy in other.buddies {
            self.upsert_buddy(buddy);
        }
        self.users.extend(other.users);
    }
}
