//! Crossover CLI - run the chat bot and inspect its state.
//!
//! `run` connects the bot to the named-pipe bridge of a running chat client.
//! `console` talks to the bot directly from the terminal, which is handy for
//! trying out commands and aliases without a chat client at all.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use xo_core::config::AppConfig;
use xo_core::constants::APP_VERSION;
use xo_core::error::XoResult;
use xo_core::logging;

/// Crossover - a command bot that also mirrors chats into each other.
#[derive(Parser)]
#[command(
    name = "crossover",
    version,
    about = "Chat command bot and chat relay",
    long_about = "A chat bot that answers !commands, keeps per-chat puns, aliases and nicknames,\n\
                  schedules commands for later and mirrors messages between linked chats."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot against the chat client's named-pipe bridge.
    Run {
        /// FIFO the bridge writes incoming messages to (overrides config).
        #[arg(long)]
        inbound: Option<String>,
        /// File outgoing messages are appended to (overrides config).
        #[arg(long)]
        outbound: Option<String>,
    },
    /// Talk to the bot from the terminal.
    Console {
        /// Name you appear as.
        #[arg(short, long, default_value = "you")]
        user: String,
        /// Title of the chat you are in.
        #[arg(long, default_value = "Console")]
        chat: String,
    },
    /// List scheduled events.
    Events,
    /// Show the message link table.
    Links,
    /// Show or create the configuration file.
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> XoResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match cli.config.as_deref() {
        Some(path) => PathBuf::from(path),
        None => AppConfig::default_config_path()?,
    };
    let config = AppConfig::load_or_default(&config_path)?;

    // Only `run` keeps log files and the transcript.
    let guard = if matches!(cli.command, Commands::Run { .. }) {
        let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
        Some(logging::init_logging(
            &config.logging,
            level,
            &config.effective_log_dir()?,
        )?)
    } else {
        logging::init_console_logging(if cli.verbose { "debug" } else { "warn" });
        None
    };

    info!("Crossover CLI v{APP_VERSION}");

    match cli.command {
        Commands::Run { inbound, outbound } => {
            let code = commands::run::run(config, inbound, outbound).await?;
            drop(guard);
            std::process::exit(code);
        }
        Commands::Console { user, chat } => commands::console::run(config, user, chat).await,
        Commands::Events => commands::events::run(&config, cli.format),
        Commands::Links => commands::links::run(&config, cli.format),
        Commands::Config { action } => {
            commands::config::run(&config, &config_path, action, cli.format)
        }
    }
}
