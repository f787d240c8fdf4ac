use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use sheetcal_core::SyncConfig;

pub fn run(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    SyncConfig::create_default_config(config_path)?;

    println!("{} {}", "Created".green(), config_path.display());
    println!();
    println!("Fill in calendar_id, spreadsheet_id and google_account, then run:");
    println!("  sheetcal sync --dry-run");

    Ok(())
}
