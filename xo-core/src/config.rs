//! Bot configuration management.
//!
//! Handles loading, saving, and accessing the bot configuration: command
//! syntax, location defaults, polling behaviour, storage location, logging
//! and the named-pipe bridge. Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{XoError, XoResult};
use crate::paths;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Command handling and polling settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Where persisted state lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Named-pipe bridge settings.
    #[serde(default)]
    pub pipe: PipeConfig,
}

/// Command handling and polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// What character(s) commands start with.
    #[serde(default = "default_command_delimiter")]
    pub command_delimiter: String,

    /// Location used when a check-in names none.
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Check-in length when no duration is given, in minutes.
    #[serde(default = "default_loc_minutes")]
    pub default_loc_minutes: i64,

    /// Maximum number of queued messages handled per tick.
    #[serde(default = "default_overflow_threshold")]
    pub overflow_threshold: usize,

    /// How late (seconds) a scheduled event may be and still replay.
    #[serde(default = "default_replay_threshold")]
    pub event_replay_threshold_secs: u64,

    /// Commands listed per `help` page.
    #[serde(default = "default_help_per_page")]
    pub help_commands_per_page: usize,

    /// Polling loop interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

/// Persisted state configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the JSON state files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,
}

/// Diagnostic log and message transcript settings for `crossover run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive for the diagnostic log, usually just a level.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Holds `crossover.log` and the transcript. Empty means `<data dir>/logs`.
    #[serde(default)]
    pub directory: String,

    /// Write `crossover.log` as JSON lines. The transcript stays plain text.
    #[serde(default)]
    pub json_output: bool,

    /// File name of the message transcript inside the log directory.
    #[serde(default = "default_transcript_file")]
    pub transcript_file: String,
}

/// Named-pipe bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeConfig {
    /// FIFO the bridge writes incoming messages and directory frames to.
    #[serde(default = "default_inbound_path")]
    pub inbound_path: String,

    /// File the bot appends outgoing send requests to.
    #[serde(default = "default_outbound_path")]
    pub outbound_path: String,

    /// Confirmations older than this many seconds are discarded.
    #[serde(default = "default_staleness")]
    pub staleness_secs: u64,
}

// Default value functions for serde

fn default_command_delimiter() -> String {
    constants::DEFAULT_COMMAND_DELIMITER.to_string()
}

fn default_location() -> String {
    constants::DEFAULT_LOCATION.to_string()
}

fn default_loc_minutes() -> i64 {
    constants::DEFAULT_LOC_MINUTES
}

fn default_overflow_threshold() -> usize {
    constants::DEFAULT_OVERFLOW_THRESHOLD
}

fn default_replay_threshold() -> u64 {
    constants::DEFAULT_EVENT_REPLAY_THRESHOLD_SECS
}

fn default_help_per_page() -> usize {
    constants::DEFAULT_HELP_COMMANDS_PER_PAGE
}

fn default_tick_interval() -> u64 {
    constants::DEFAULT_TICK_INTERVAL_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_transcript_file() -> String {
    "Pidgin_Crossover_Messages.log".to_string()
}

fn default_inbound_path() -> String {
    "pidginBotPipe".to_string()
}

fn default_outbound_path() -> String {
    "pidginBotOutbox".to_string()
}

fn default_staleness() -> u64 {
    constants::DEFAULT_CONFIRMATION_STALENESS_SECS
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_delimiter: default_command_delimiter(),
            default_location: default_location(),
            default_loc_minutes: default_loc_minutes(),
            overflow_threshold: default_overflow_threshold(),
            event_replay_threshold_secs: default_replay_threshold(),
            help_commands_per_page: default_help_per_page(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
            transcript_file: default_transcript_file(),
        }
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            inbound_path: default_inbound_path(),
            outbound_path: default_outbound_path(),
            staleness_secs: default_staleness(),
        }
    }
}

impl BotConfig {
    /// The replay threshold, capped at the hard maximum.
    pub fn replay_threshold(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.event_replay_threshold_secs
                .min(constants::MAX_EVENT_REPLAY_THRESHOLD_SECS),
        )
    }

    /// The default check-in duration as a human string, e.g. "45 minutes".
    pub fn default_loc_time(&self) -> String {
        format!("{} minutes", self.default_loc_minutes)
    }
}

impl AppConfig {
    /// `config.toml` from the default config directory, or the built-in
    /// defaults when there is none.
    pub fn load_default() -> XoResult<Self> {
        Self::load_or_default(&Self::default_config_path()?)
    }

    /// Like `load_from_file`, but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> XoResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and validate a TOML config file.
    pub fn load_from_file(path: &Path) -> XoResult<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    fn parse(contents: &str) -> XoResult<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as TOML, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> XoResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| XoError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/config.toml`.
    pub fn default_config_path() -> XoResult<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    /// Reject settings the bot cannot run with.
    pub fn validate(&self) -> XoResult<()> {
        if self.bot.command_delimiter.is_empty() {
            return Err(XoError::MissingConfig("bot.command_delimiter".into()));
        }
        if self.bot.command_delimiter.contains(char::is_whitespace) {
            return Err(XoError::Config(
                "bot.command_delimiter must not contain whitespace".into(),
            ));
        }
        if self.bot.help_commands_per_page == 0 {
            return Err(XoError::Config("bot.help_commands_per_page must be positive".into()));
        }
        if self.bot.tick_interval_ms == 0 {
            return Err(XoError::Config("bot.tick_interval_ms must be positive".into()));
        }
        Ok(())
    }

    /// Get the effective state directory, using the configured path or the default.
    pub fn effective_storage_dir(&self) -> XoResult<PathBuf> {
        if self.storage.directory.is_empty() {
            Ok(paths::data_dir()?.join("state"))
        } else {
            Ok(PathBuf::from(&self.storage.directory))
        }
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> XoResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(paths::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }
}
