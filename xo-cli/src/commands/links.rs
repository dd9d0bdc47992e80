//! Links command - show which chats mirror into which.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use xo_core::config::AppConfig;
use xo_core::error::XoResult;

use crate::OutputFormat;

pub fn run(config: &AppConfig, format: OutputFormat) -> XoResult<()> {
    let state = super::load_state(config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state.links)?);
        }
        OutputFormat::Text => {
            if state.links.is_empty() {
                println!("No chats are linked.");
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["Chat", "Mirrors into"]);
            for (source, targets) in state.links.iter() {
                table.add_row(vec![source.clone(), targets.join("\n")]);
            }

            println!("{table}");
            println!("\n{} linked chat(s).", state.links.len());
        }
    }
    Ok(())
}
