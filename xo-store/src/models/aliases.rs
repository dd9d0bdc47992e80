//! Per-chat command aliases.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// A user-defined shorthand for a command invocation.
///
/// `expansion` is the command line without the delimiter, e.g.
/// `"to hugs %target"`, kept for display. Running the alias invokes
/// `command()` with `args`, the words after the command name, followed by
/// whatever was typed after the alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAlias")]
pub struct Alias {
    pub expansion: String,
    pub args: Vec<String>,
}

/// Older files stored just the expansion string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAlias {
    Plain(String),
    Full { expansion: String, args: Vec<String> },
}

impl From<RawAlias> for Alias {
    fn from(raw: RawAlias) -> Self {
        match raw {
            RawAlias::Plain(expansion) => Alias::new(&expansion),
            RawAlias::Full { expansion, args } => Alias { expansion, args },
        }
    }
}

impl Alias {
    /// Build an alias from its expansion, deriving the argument list.
    pub fn new(expansion: &str) -> Self {
        let expansion = expansion.trim().to_string();
        let args = expansion
            .split_whitespace()
            .skip(1)
            .map(str::to_string)
            .collect();
        Self { expansion, args }
    }

    /// The command this alias runs.
    pub fn command(&self) -> &str {
        self.expansion.split_whitespace().next().unwrap_or("")
    }
}

/// Mapping from chat title to that chat's aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasBook {
    aliases: BTreeMap<String, BTreeMap<String, Alias>>,
}

impl AliasBook {
    pub fn get(&self, chat: &str, name: &str) -> Option<&Alias> {
        self.aliases.get(chat)?.get(name)
    }

    /// Bind `name` to `alias` in a chat, replacing any previous binding.
    pub fn set(&mut self, chat: &str, name: &str, alias: Alias) {
        self.aliases
            .entry(chat.to_string())
            .or_default()
            .insert(name.to_string(), alias);
    }

    pub fn remove(&mut self, chat: &str, name: &str) -> Option<Alias> {
        self.aliases.get_mut(chat)?.remove(name)
    }

    /// Alias names defined in a chat, sorted.
    pub fn names(&self, chat: &str) -> Vec<&str> {
        self.aliases
            .get(chat)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
