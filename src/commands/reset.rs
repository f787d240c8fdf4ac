use anyhow::Result;
use sheetcal_core::{CursorStore, FileStore, SyncConfig};

use crate::config::state_path;

pub fn run(config: &SyncConfig) -> Result<()> {
    let store = FileStore::new(state_path(config)?);
    let cursor = CursorStore::new(&store, config.cursor_key.clone(), config.start_row);

    cursor.reset()?;
    println!("Cursor reset to row {}", cursor.start_row());

    Ok(())
}
