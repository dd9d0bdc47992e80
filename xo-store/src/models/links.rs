//! Message links between chats.
//!
//! A link mirrors every message seen in the source chat into each target
//! chat. Chats are keyed by title so links survive client restarts, which
//! renumber conversations.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// On-disk form of a link entry: a single title or a list of titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LinkTargets {
    One(String),
    Many(Vec<String>),
}

type RawLinks = BTreeMap<String, LinkTargets>;

/// Mapping from a chat title to the chat titles it mirrors into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLinks", into = "RawLinks")]
pub struct MessageLinks {
    links: BTreeMap<String, Vec<String>>,
}

impl From<RawLinks> for MessageLinks {
    fn from(raw: RawLinks) -> Self {
        let links = raw
            .into_iter()
            .map(|(source, targets)| {
                let targets = match targets {
                    LinkTargets::One(t) => vec![t],
                    LinkTargets::Many(ts) => ts,
                };
                (source, targets)
            })
            .filter(|(_, targets)| !targets.is_empty())
            .collect();
        Self { links }
    }
}

impl From<MessageLinks> for RawLinks {
    fn from(links: MessageLinks) -> Self {
        links
            .links
            .into_iter()
            .map(|(source, mut targets)| {
                let entry = if targets.len() == 1 {
                    LinkTargets::One(targets.remove(0))
                } else {
                    LinkTargets::Many(targets)
                };
                (source, entry)
            })
            .collect()
    }
}

impl MessageLinks {
    /// Titles the given chat mirrors into. Empty when unlinked.
    pub fn targets(&self, source: &str) -> &[String] {
        self.links.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the given chat has any links.
    pub fn contains(&self, source: &str) -> bool {
        self.links.contains_key(source)
    }

    /// Link `source` to every title in `targets`, keeping existing links.
    ///
    /// Returns the full, sorted target list afterwards. Self links are ignored.
    pub fn link<I>(&mut self, source: &str, targets: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let entry = self.links.entry(source.to_string()).or_default();
        for target in targets {
            if target != source && !entry.contains(&target) {
                entry.push(target);
            }
        }
        entry.sort();
        let result = entry.clone();
        if result.is_empty() {
            self.links.remove(source);
        }
        result
    }

    /// Remove each title in `targets` from `source`'s links.
    ///
    /// Returns the titles that were actually removed. The source entry is
    /// dropped once it has no targets left.
    pub fn unlink(&mut self, source: &str, targets: &[String]) -> Vec<String> {
        let Some(entry) = self.links.get_mut(source) else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        for target in targets {
            if let Some(pos) = entry.iter().position(|t| t == target) {
                removed.push(entry.remove(pos));
            }
        }
        if entry.is_empty() {
            self.links.remove(source);
        }
        removed
    }

    /// Iterate over `(source, targets)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.links.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}

impl std::fmt::Display for MessageLinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.links.is_empty() {
            return write!(f, "No chats are linked.");
        }
        let lines: Vec<String> = self
            .links
            .iter()
            .map(|(source, targets)| format!("{source} -> {}", targets.join(", ")))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_single_and_list_entries() {
        let links: MessageLinks = serde_json::from_str(
            r#"{"Dorm": "Family", "Team": ["Alpha", "Beta"], "Empty": []}"#,
        )
        .unwrap();
        assert_eq!(links.targets("Dorm"), ["Family".to_string()]);
        assert_eq!(links.targets("Team").len(), 2);
        assert!(!links.contains("Empty"));
        assert!(links.targets("Nowhere").is_empty());
    }

    #[test]
    fn test_single_target_written_as_string() {
        let mut links = MessageLinks::default();
        links.link("Dorm", vec!["Family".to_string()]);
        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json, serde_json::json!({"Dorm": "Family"}));
    }

    #[test]
    fn test_link_merges_with_existing_targets() {
        let mut links = MessageLinks::default();
        links.link("Team", vec!["Beta".to_string()]);
        let all = links.link("Team", vec!["Alpha".to_string(), "Beta".to_string(), "Team".to_string()]);
        assert_eq!(all, vec!["Alpha".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn test_unlink_drops_empty_entries() {
        let mut links = MessageLinks::default();
        links.link("Team", vec!["Alpha".to_string(), "Beta".to_string()]);

        let removed = links.unlink("Team", &["Alpha".to_string(), "Gamma".to_string()]);
        assert_eq!(removed, vec!["Alpha".to_string()]);
        assert!(links.contains("Team"));

        links.unlink("Team", &["Beta".to_string()]);
        assert!(links.is_empty());
        assert!(links.unlink("Team", &["Beta".to_string()]).is_empty());
    }

    #[test]
    fn test_display() {
        let mut links = MessageLinks::default();
        assert_eq!(links.to_string(), "No chats are linked.");
        links.link("Team", vec!["Alpha".to_string(), "Beta".to_string()]);
        assert_eq!(links.to_string(), "Team -> Alpha, Beta");
    }
}
