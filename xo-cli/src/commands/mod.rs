//! CLI command implementations.

pub mod config;
pub mod console;
pub mod events;
pub mod links;
pub mod run;

use xo_core::config::AppConfig;
use xo_core::error::XoResult;
use xo_store::{BotState, Store};

/// Helper to open the state directory from config.
pub fn open_store(config: &AppConfig) -> XoResult<Store> {
    Store::open(&config.effective_storage_dir()?)
}

/// Helper to read every persisted book from config.
pub fn load_state(config: &AppConfig) -> XoResult<BotState> {
    Ok(BotState::load(open_store(config)?))
}

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer message", 9), "a long...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
