//! The polling loop connecting the confirmation queue to the bot.

use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use xo_bus::ConfirmationQueue;
use xo_core::config::AppConfig;
use xo_core::error::XoResult;

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::service::Service;

/// A week; longer windows are clamped.
const MAX_STALENESS_SECS: u64 = 7 * 24 * 3_600;

/// Run `bot` until a command asks it to exit or the process gets Ctrl-C.
///
/// Each tick moves fresh confirmations into the bot's queue and lets it
/// handle them. State is flushed on the way out. Returns the exit code.
pub async fn run(mut bot: Bot, queue: ConfirmationQueue, config: &AppConfig) -> XoResult<i32> {
    bot.init()?;

    let staleness =
        chrono::Duration::seconds(config.pipe.staleness_secs.min(MAX_STALENESS_SECS) as i64);
    let mut ticker = interval(Duration::from_millis(config.bot.tick_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "polling every {}ms, dropping confirmations older than {}s",
        config.bot.tick_interval_ms, config.pipe.staleness_secs
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut watching_ctrl_c = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                for message in queue.drain_fresh(now, staleness) {
                    bot.enqueue(MessageContext::from(message));
                }
                if !bot.tick(now) {
                    break;
                }
            }
            result = &mut ctrl_c, if watching_ctrl_c => {
                match result {
                    Ok(()) => {
                        info!("interrupted, shutting down");
                        break;
                    }
                    Err(e) => {
                        warn!("failed to listen for ctrl-c, only chat can stop the bot: {e}");
                        watching_ctrl_c = false;
                    }
                }
            }
        }
    }

    bot.shutdown()?;
    Ok(bot.exit_code().unwrap_or(0))
}
