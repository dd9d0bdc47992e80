//! Tracing setup for the bot process.
//!
//! Three sinks hang off one registry: compact console output, a daily
//! `crossover.log` (plain or JSON), and the message transcript. The
//! transcript only takes events logged with the `transcript` target and
//! is never rotated, so it reads as one running chat log.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingConfig;
use crate::constants::{LOG_FILE_PREFIX, TRANSCRIPT_TARGET};
use crate::error::XoResult;

/// Filter directive for `level` that still lets transcript events through.
fn directive(level: &str) -> String {
    let level = match level.trim() {
        "" => "info",
        other => other,
    };
    format!("{level},{TRANSCRIPT_TARGET}=info")
}

/// Install the global subscriber for a long-running bot.
///
/// `level` overrides `settings.level` (the CLI passes `debug` for
/// `--verbose`). Log files go under `log_dir`, which is created.
pub fn init_logging(settings: &LoggingConfig, level: &str, log_dir: &Path) -> XoResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let (log_writer, log_guard) =
        tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));
    let (transcript_writer, transcript_guard) =
        tracing_appender::non_blocking(rolling::never(log_dir, &settings.transcript_file));

    let env_filter =
        EnvFilter::try_new(directive(level)).unwrap_or_else(|_| EnvFilter::new(directive("info")));

    let console_layer = fmt::layer().with_target(true).compact();

    let (json_file, text_file) = if settings.json_output {
        let layer = fmt::layer()
            .with_writer(log_writer)
            .json()
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .with_writer(log_writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true);
        (None, Some(layer))
    };

    let transcript_layer = fmt::layer()
        .with_writer(transcript_writer)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .with_filter(filter_fn(|meta| meta.target() == TRANSCRIPT_TARGET));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(json_file)
        .with(text_file)
        .with(transcript_layer)
        .init();

    tracing::info!(
        "logging to {} at {level}, transcript in {}",
        log_dir.display(),
        settings.transcript_file
    );

    Ok(LogGuard {
        _log: log_guard,
        _transcript: transcript_guard,
    })
}

/// Keeps the background writers alive. Dropping it flushes both files.
pub struct LogGuard {
    _log: WorkerGuard,
    _transcript: WorkerGuard,
}

/// Console-only logging for the short-lived subcommands. Safe to call
/// more than once.
pub fn init_console_logging(level: &str) {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_keeps_transcript() {
        assert_eq!(directive("warn"), "warn,transcript=info");
        assert_eq!(directive("  "), "info,transcript=info");
    }

    #[test]
    fn test_console_logging_twice() {
        init_console_logging("debug");
        init_console_logging("not a level");
    }
}
