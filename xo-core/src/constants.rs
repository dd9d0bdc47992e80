//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "Crossover";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What character(s) commands start with by default.
pub const DEFAULT_COMMAND_DELIMITER: &str = "!";

/// Location used by `gds` and by `loc` without arguments.
pub const DEFAULT_LOCATION: &str = "GDS";

/// How long a check-in lasts when no duration is given.
pub const DEFAULT_LOC_MINUTES: i64 = 45;

/// More queued messages than this within one tick are dropped as a flood.
pub const DEFAULT_OVERFLOW_THRESHOLD: usize = 3;

/// How late a scheduled event may fire and still be replayed.
pub const DEFAULT_EVENT_REPLAY_THRESHOLD_SECS: u64 = 2;

/// Hard cap on the replay threshold regardless of configuration.
pub const MAX_EVENT_REPLAY_THRESHOLD_SECS: u64 = 5;

/// Confirmations older than this are discarded unprocessed.
pub const DEFAULT_CONFIRMATION_STALENESS_SECS: u64 = 300;

/// Polling loop interval.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// How many commands `help` shows per page.
pub const DEFAULT_HELP_COMMANDS_PER_PAGE: usize = 10;

/// Conversation ids above this are never preferred when deduplicating
/// group chats with the same title.
pub const MAX_PREFERRED_CONVERSATION_ID: i64 = 10_000;

/// Timestamp format used in the persisted JSON files.
pub const SERIALIZED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Human-facing date format used in replies.
pub const DISPLAY_DATE_FORMAT: &str = "%a, %b %d %Y at %I:%M%p";

/// Tracing target whose events are written to the message transcript.
pub const TRANSCRIPT_TARGET: &str = "transcript";

/// Prefix of the daily-rolled diagnostic log.
pub const LOG_FILE_PREFIX: &str = "crossover.log";

/// Process exit codes requested from chat.
pub mod exit_codes {
    /// `!exit`: stop and stay stopped.
    pub const EXIT: i32 = 37;
    /// `!restart`: stop so a supervisor restarts the bot.
    pub const RESTART: i32 = 0;
}

/// Persisted state file names, kept compatible with existing bot data.
pub mod files {
    pub const MESSAGE_LINKS: &str = "messageLinks.json";
    pub const PUNS: &str = "Puns.json";
    pub const ALIASES: &str = "Aliases.json";
    pub const CHECK_INS: &str = "atLoc.json";
    pub const SCHEDULED_EVENTS: &str = "scheduledEvents.json";
    pub const NICKS: &str = "nicks.json";

    /// All state files.
    pub const ALL: &[&str] = &[
        MESSAGE_LINKS,
        PUNS,
        ALIASES,
        CHECK_INS,
        SCHEDULED_EVENTS,
        NICKS,
    ];
}

/// Protocol names that need plain-text bold markers instead of HTML.
pub mod protocols {
    pub const FACEBOOK: &str = "facebook";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_files() {
        assert_eq!(files::ALL.len(), 6);
        assert!(files::ALL.contains(&"atLoc.json"));
    }

    #[test]
    fn test_replay_threshold_within_cap() {
        assert!(DEFAULT_EVENT_REPLAY_THRESHOLD_SECS <= MAX_EVENT_REPLAY_THRESHOLD_SECS);
    }
}
