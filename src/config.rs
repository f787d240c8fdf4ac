use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sheetcal_core::SyncConfig;

/// `--config` / `SHEETCAL_CONFIG` if given, else ~/.config/sheetcal/config.toml
pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(SyncConfig::default_path()?),
    }
}

pub fn load(path: &Path) -> Result<SyncConfig> {
    let config = SyncConfig::load(path)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Where the cursor lives for this config.
pub fn state_path(config: &SyncConfig) -> Result<PathBuf> {
    config
        .state_path()
        .context("Could not determine where to keep the cursor")
}
