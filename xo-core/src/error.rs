//! Global error types for the Crossover bot.
//!
//! All error categories across the workspace are unified into a single
//! `XoError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using XoError.
pub type XoResult<T> = Result<T, XoError>;

/// Unified error type covering all error categories in Crossover.
#[derive(Error, Debug)]
pub enum XoError {
    // -- Configuration errors --
    /// Failed to load or parse configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Storage errors --
    /// A persisted state file could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // -- Chat client errors --
    /// The chat client bridge failed.
    #[error("bus error: {0}")]
    Bus(String),

    /// No conversation with the given id or title is known.
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    /// No account with the given id or username is known.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Sending a message to a conversation failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    // -- Command errors --
    /// The user invoked a command incorrectly. The message is shown as-is.
    #[error("{0}")]
    Usage(String),

    /// A command handler failed.
    #[error("command error: {0}")]
    Command(String),

    /// A natural-language time could not be understood.
    #[error("Could not understand the time \"{0}\".")]
    TimeParse(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl XoError {
    /// Shorthand for a user-facing usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        XoError::Usage(msg.into())
    }

    /// Whether this error is a user-facing usage message.
    pub fn is_usage(&self) -> bool {
        matches!(self, XoError::Usage(_))
    }

    /// Whether the message is meant to be shown to chat users verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, XoError::Usage(_) | XoError::TimeParse(_))
    }
}

impl From<serde_json::Error> for XoError {
    fn from(e: serde_json::Error) -> Self {
        XoError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for XoError {
    fn from(e: toml::de::Error) -> Self {
        XoError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xo_error_display() {
        let err = XoError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_usage_error_is_verbatim() {
        let err = XoError::usage("Enter an alias to remove!");
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "Enter an alias to remove!");
    }

    #[test]
    fn test_json_error_conversion() {
        let raw = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: XoError = raw.into();
        assert!(matches!(err, XoError::Serialization(_)));
        assert!(!err.is_usage());
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_time_parse_is_user_facing() {
        let err = XoError::TimeParse("whenever".into());
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "Could not understand the time \"whenever\".");
    }
}
