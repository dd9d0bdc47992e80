//! Config commands - show the effective configuration or write defaults.

use std::path::Path;

use clap::Subcommand;
use console::style;

use xo_core::config::AppConfig;
use xo_core::error::{XoError, XoResult};

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(
    config: &AppConfig,
    path: &Path,
    action: ConfigAction,
    format: OutputFormat,
) -> XoResult<()> {
    match action {
        ConfigAction::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Text => {
                let source = if path.exists() {
                    path.display().to_string()
                } else {
                    "built-in defaults".to_string()
                };
                println!("{} {}\n", style("# Loaded from").dim(), style(source).dim());
                let text = toml::to_string_pretty(config)
                    .map_err(|e| XoError::Config(format!("failed to serialize config: {e}")))?;
                println!("{text}");
            }
        },
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                println!(
                    "{} {} already exists (use --force to overwrite).",
                    style("WARN").yellow().bold(),
                    path.display()
                );
                return Ok(());
            }
            AppConfig::default().save_to_file(path)?;
            println!(
                "  {} Wrote default configuration to {}",
                style("OK").green().bold(),
                style(path.display()).bold()
            );
        }
    }
    Ok(())
}
