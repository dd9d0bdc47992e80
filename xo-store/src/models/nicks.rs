//! Per-chat nicknames.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Mapping from chat title to `real name -> nickname`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NickBook {
    nicks: BTreeMap<String, BTreeMap<String, String>>,
}

impl NickBook {
    pub fn get(&self, chat: &str, real_name: &str) -> Option<&str> {
        self.nicks.get(chat)?.get(real_name).map(String::as_str)
    }

    pub fn set(&mut self, chat: &str, real_name: &str, nick: &str) {
        self.nicks
            .entry(chat.to_string())
            .or_default()
            .insert(real_name.to_string(), nick.to_string());
    }

    pub fn remove(&mut self, chat: &str, real_name: &str) -> Option<String> {
        self.nicks.get_mut(chat)?.remove(real_name)
    }

    /// Real name owning `nick` in a chat, if any.
    pub fn real_name_for(&self, chat: &str, nick: &str) -> Option<&str> {
        self.nicks
            .get(chat)?
            .iter()
            .find(|(_, n)| n.as_str() == nick)
            .map(|(real, _)| real.as_str())
    }

    /// `(real name, nickname)` pairs for a chat, sorted by real name.
    pub fn list(&self, chat: &str) -> Vec<(&str, &str)> {
        self.nicks
            .get(chat)
            .map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
            .unwrap_or_default()
    }

    /// Whether any nickname was ever set in a chat.
    pub fn has_chat(&self, chat: &str) -> bool {
        self.nicks.contains_key(chat)
    }
}
