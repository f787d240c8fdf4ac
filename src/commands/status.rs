use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use sheetcal_core::{CursorStore, FileStore, Provider, SyncConfig};

use crate::config::state_path;

pub fn run(config_path: &Path, config: &SyncConfig) -> Result<()> {
    let state_path = state_path(config)?;
    let store = FileStore::new(&state_path);
    let cursor = CursorStore::new(&store, config.cursor_key.clone(), config.start_row);
    let provider = Provider::from_name(&config.provider.name);

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  State:   {}", state_path.display());
    println!();

    println!("{}", "Sheet".bold());
    println!("  Spreadsheet:  {}", config.spreadsheet_id);
    println!(
        "  Rows:         {}!{}-{}",
        config.sheet_name, config.start_row, config.end_row
    );
    println!(
        "  Time zone:    {}",
        config.timezone.as_deref().unwrap_or("(system default)")
    );
    println!();

    println!("{}", "Calendar".bold());
    println!("  Calendar:  {}", config.calendar_id);
    println!("  Titles:    \"{} <title>\"", config.event_prefix);
    println!("  Color:     {}", config.color_id);
    println!();

    let installed = if provider.is_installed() {
        "installed".green().to_string()
    } else {
        "not installed".red().to_string()
    };
    println!("{}", "Provider".bold());
    println!("  {} ({})", provider.binary_name(), installed);
    println!();

    println!("Next run starts at row {}", cursor.load()?.bold());

    Ok(())
}
