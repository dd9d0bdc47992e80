//! Per-chat pun lists.

use std::collections::BTreeMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome of picking a pun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PunPick {
    /// The chat has no puns at all.
    Empty,
    /// A pun matching the filter (or any pun when unfiltered).
    Match(String),
    /// Nothing matched the filter; a random pun instead.
    NoMatch(String),
}

/// Mapping from chat title to that chat's puns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PunBook {
    puns: BTreeMap<String, Vec<String>>,
}

impl PunBook {
    /// Append a pun to a chat's list.
    pub fn add(&mut self, chat: &str, pun: &str) {
        self.puns.entry(chat.to_string()).or_default().push(pun.to_string());
    }

    /// Remove the first pun containing `filter`, returning it.
    pub fn remove_matching(&mut self, chat: &str, filter: &str) -> Option<String> {
        let list = self.puns.get_mut(chat)?;
        let pos = list.iter().position(|pun| pun.contains(filter))?;
        Some(list.remove(pos))
    }

    /// Pick a random pun, preferring ones that contain `filter`.
    pub fn pick<R: Rng + ?Sized>(&self, chat: &str, filter: Option<&str>, rng: &mut R) -> PunPick {
        let Some(list) = self.puns.get(chat).filter(|l| !l.is_empty()) else {
            return PunPick::Empty;
        };

        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        let Some(filter) = filter else {
            return list
                .choose(rng)
                .map(|p| PunPick::Match(p.clone()))
                .unwrap_or(PunPick::Empty);
        };

        let matching: Vec<&String> = list.iter().filter(|p| p.contains(filter)).collect();
        match matching.choose(rng) {
            Some(pun) => PunPick::Match((*pun).clone()),
            None => list
                .choose(rng)
                .map(|p| PunPick::NoMatch(p.clone()))
                .unwrap_or(PunPick::Empty),
        }
    }

    /// All puns for a chat.
    pub fn list(&self, chat: &str) -> &[String] {
        self.puns.get(chat).map(Vec::as_slice).unwrap_or(&[])
    }
}
