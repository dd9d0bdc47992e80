//! Events command - list persisted scheduled events.

use chrono::{Local, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use xo_core::config::AppConfig;
use xo_core::error::XoResult;
use xo_store::ScheduledEvent;

use crate::OutputFormat;

pub fn run(config: &AppConfig, format: OutputFormat) -> XoResult<()> {
    let state = super::load_state(config)?;

    match format {
        OutputFormat::Json => {
            let events: Vec<&ScheduledEvent> = state.events.iter().map(|(_, e)| e).collect();
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        OutputFormat::Text => {
            if state.events.is_empty() {
                println!("No scheduled events.");
                return Ok(());
            }

            let now = Utc::now();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["#", "Fires", "Status", "Chat", "Sender", "Command"]);

            for (index, event) in state.events.iter() {
                let status = if event.is_due(now) { "overdue" } else { "pending" };
                table.add_row(vec![
                    index.to_string(),
                    event
                        .fire_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                    status.to_string(),
                    super::truncate(&event.replay.conversation, 30),
                    event.replay.sender.clone(),
                    super::truncate(&event.replay.message, 40),
                ]);
            }

            println!("{table}");
            println!("\n{} scheduled event(s).", state.events.len());
        }
    }
    Ok(())
}
