//! `tutorgen providers` — show the active provider and its status.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use tutorgen_providers::config::load_config_from;
use tutorgen_providers::Orchestrator;

pub fn execute(config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let orchestrator = Orchestrator::from_config(&config);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["active provider", "model", "status"]);
    table.add_row(vec![
        orchestrator.active_provider().to_string(),
        orchestrator
            .active_model()
            .unwrap_or("-")
            .to_string(),
        if orchestrator.available_providers().is_empty() {
            "not configured".to_string()
        } else {
            "ready".to_string()
        },
    ]);
    println!("{table}");

    let configured: Vec<&String> = config.providers.keys().collect();
    if !configured.is_empty() {
        let mut names: Vec<&str> = configured.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        println!("configured entries: {}", names.join(", "));
    }

    Ok(())
}
