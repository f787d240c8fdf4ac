//! sheetcal: turn rows of a scheduling spreadsheet into calendar events.
//!
//! Usage:
//!   sheetcal init             # Write a starter config
//!   sheetcal sync             # Create events for new rows
//!   sheetcal sync --dry-run   # Preview without creating or moving the cursor
//!   sheetcal status           # Show configuration and cursor
//!   sheetcal reset            # Start the next run from the first data row

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sheetcal")]
#[command(about = "Create calendar events from spreadsheet rows, resuming where the last run stopped")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.config/sheetcal/config.toml)
    #[arg(short, long, global = true, env = "SHEETCAL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create events for rows not yet on the calendar
    Sync {
        /// Report what would be created without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show configuration and the stored cursor
    Status,
    /// Reset the cursor to the first data row
    Reset,
    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let config_path = config::resolve_path(cli.config)?;

    match cli.command {
        Commands::Init => commands::init::run(&config_path),
        Commands::Sync { dry_run } => {
            let cfg = config::load(&config_path)?;
            commands::sync::run(&cfg, dry_run).await
        }
        Commands::Status => {
            let cfg = config::load(&config_path)?;
            commands::status::run(&config_path, &cfg)
        }
        Commands::Reset => {
            let cfg = config::load(&config_path)?;
            commands::reset::run(&cfg)
        }
    }
}
