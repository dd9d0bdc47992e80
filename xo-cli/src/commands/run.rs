//! Run command - the bot on top of the named-pipe bridge.

use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use xo_bot::event_bus::event_label;
use xo_bot::{AppEvent, Bot, EventBus};
use xo_bus::{ConfirmationQueue, PipeClient, PipeListener};
use xo_core::config::AppConfig;
use xo_core::error::XoResult;

/// Start the listener and the polling loop. Returns the bot's exit code.
pub async fn run(
    config: AppConfig,
    inbound: Option<String>,
    outbound: Option<String>,
) -> XoResult<i32> {
    let inbound = inbound.unwrap_or_else(|| config.pipe.inbound_path.clone());
    let outbound = outbound.unwrap_or_else(|| config.pipe.outbound_path.clone());

    let queue = ConfirmationQueue::new();
    let client = Arc::new(PipeClient::new(&outbound, queue.clone())?);
    let listener = PipeListener::spawn(client.clone(), &inbound)?;

    let store = super::open_store(&config)?;
    info!("state directory: {}", store.dir().display());

    let bus = EventBus::default();
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(AppEvent::CommandFailed { command, conversation, error }) => {
                    warn!("{command} failed in {conversation}: {error}");
                }
                Ok(event) => debug!("event: {}", event_label(&event)),
                Err(RecvError::Lagged(n)) => warn!("event log lagged, {n} event(s) skipped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!(
        "  {} Listening on {}, sending to {}",
        style("OK").green().bold(),
        style(&inbound).bold(),
        style(&outbound).bold()
    );

    let bot = Bot::new(client.clone(), store, config.bot.clone(), bus);
    let result = xo_bot::run(bot, queue, &config).await;
    listener.shutdown();
    if !client.flush(Duration::from_secs(2)) {
        warn!("unsent messages left for {outbound}, nothing is reading it");
    }

    let code = result?;
    info!("exiting with code {code}");
    Ok(code)
}
