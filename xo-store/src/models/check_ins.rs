//! Location check-ins.
//!
//! Each entry records when someone said they went somewhere, where, and
//! for how long (as the free-form text they typed). Stored on disk as a
//! `[timestamp, location, duration]` triple per person.

use std::collections::BTreeMap;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn(
    #[serde(serialize_with = "crate::datefmt::serialize", deserialize_with = "crate::datefmt::deserialize_or_now")]
    DateTime<Utc>,
    String,
    String,
);

impl CheckIn {
    pub fn new(at: DateTime<Utc>, location: &str, duration: &str) -> Self {
        Self(at, location.to_string(), duration.to_string())
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn location(&self) -> &str {
        &self.1
    }

    pub fn duration(&self) -> &str {
        &self.2
    }

    /// Whether the check-in is still current at `now`.
    pub fn is_current(&self, now: DateTime<Utc>, length: Duration) -> bool {
        let elapsed = now - self.0;
        elapsed < length
    }
}

/// Mapping from chat title to `name -> check-in`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInBook {
    check_ins: BTreeMap<String, BTreeMap<String, CheckIn>>,
}

/// Timestamp given to check-ins that were left, far enough back that they
/// never count as current.
fn left_marker() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1901, 1, 1, 1, 1, 1)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl CheckInBook {
    /// Record (or replace) someone's check-in.
    pub fn check_in(&mut self, chat: &str, name: &str, check_in: CheckIn) {
        self.check_ins
            .entry(chat.to_string())
            .or_default()
            .insert(name.to_string(), check_in);
    }

    pub fn get(&self, chat: &str, name: &str) -> Option<&CheckIn> {
        self.check_ins.get(chat)?.get(name)
    }

    /// Mark someone as having left. Returns the location they left.
    pub fn leave(&mut self, chat: &str, name: &str) -> Option<String> {
        let entry = self.check_ins.get_mut(chat)?.get_mut(name)?;
        entry.0 = left_marker();
        Some(entry.1.clone())
    }

    /// People currently checked in, optionally only at `location`.
    ///
    /// `length_of` turns a stored duration text into a duration; entries it
    /// cannot read last `fallback`.
    pub fn present<F>(
        &self,
        chat: &str,
        location: Option<&str>,
        now: DateTime<Utc>,
        fallback: Duration,
        length_of: F,
    ) -> Vec<(&str, &CheckIn)>
    where
        F: Fn(&str) -> Option<Duration>,
    {
        let Some(entries) = self.check_ins.get(chat) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|(_, c)| {
                location.map_or(true, |loc| c.location().eq_ignore_ascii_case(loc))
            })
            .filter(|(_, c)| {
                let length = length_of(c.duration())
                    .filter(|d| *d > Duration::zero())
                    .unwrap_or(fallback);
                c.is_current(now, length)
            })
            .map(|(name, c)| (name.as_str(), c))
            .collect()
    }
}
