//! Console command - chat with the bot from stdin.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};

use xo_bot::{Bot, EventBus, MessageContext, Service};
use xo_bus::{AccountId, ConversationId, ConversationKind, MemoryClient};
use xo_core::config::AppConfig;
use xo_core::constants::APP_NAME;
use xo_core::error::XoResult;

const ACCOUNT: AccountId = 1;
const CONVERSATION: ConversationId = 1;
const USERNAME: &str = "crossover@console";

pub async fn run(config: AppConfig, user: String, chat: String) -> XoResult<()> {
    let client = Arc::new(MemoryClient::new());
    client
        .add_account(ACCOUNT, USERNAME, APP_NAME, "console")
        .add_conversation(CONVERSATION, ACCOUNT, &chat, ConversationKind::Chat)
        .add_buddy(ACCOUNT, &user, None)
        .set_chat_users(CONVERSATION, &[user.as_str(), USERNAME]);

    let store = super::open_store(&config)?;
    let mut bot = Bot::new(client.clone(), store, config.bot.clone(), EventBus::default());
    bot.init()?;

    println!(
        "  {} Talking to {} in {} as {}. Try {}, Ctrl-D to quit.",
        style("OK").green().bold(),
        style(APP_NAME).bold(),
        style(&chat).bold(),
        style(&user).bold(),
        style(format!("{}help", config.bot.command_delimiter)).cyan()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_millis(config.bot.tick_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                bot.enqueue(MessageContext::new(ACCOUNT, user.as_str(), line, CONVERSATION));
                let running = bot.tick(Utc::now());
                print_sent(&client);
                if !running {
                    break;
                }
            }
            _ = ticker.tick() => {
                // Scheduled events fire here.
                let running = bot.tick(Utc::now());
                print_sent(&client);
                if !running {
                    break;
                }
            }
        }
    }

    bot.shutdown()?;
    if let Some(code) = bot.exit_code() {
        println!("  {} Bot exited with code {code}", style("--").dim());
    }
    Ok(())
}

fn print_sent(client: &MemoryClient) {
    for sent in client.take_sent() {
        println!(
            "{} {}",
            style(format!("{APP_NAME}>")).cyan().bold(),
            sent.text.replace("<br>", "\n")
        );
    }
}
