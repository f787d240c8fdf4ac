use anyhow::Result;
use owo_colors::OwoColorize;
use sheetcal_core::{
    FileStore, ProviderBackend, RangeReader, Reconciler, RunReport, StopReason, SyncConfig,
};

use crate::config::state_path;

pub async fn run(config: &SyncConfig, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("Dry run - no events will be created and the cursor will not move");
        println!();
    }

    let backend = ProviderBackend::from_config(config);
    let store = FileStore::new(state_path(config)?);

    let reconciler = Reconciler::new(config, RangeReader::new(backend.clone()), backend, &store)
        .dry_run(dry_run);

    let report = reconciler.run().await?;
    render(&report);

    Ok(())
}

fn render(report: &RunReport) {
    println!();
    if report.dry_run {
        println!("{}", "Would make the following changes:".bold());
        println!("  Would create:    {}", report.would_create);
    } else {
        println!("{}", "Sync complete:".bold());
        println!("  Created:         {}", report.created);
    }
    println!("  Already there:   {}", report.already_existing);
    println!("  Skipped (past):  {}", report.skipped_past);
    println!("  Invalid times:   {}", report.invalid);
    if report.failed > 0 {
        println!("  Failed:          {}", report.failed.to_string().red());
    } else {
        println!("  Failed:          0");
    }
    println!();

    let stop = match report.stop {
        StopReason::QuotaExceeded(_) => report.stop.to_string().yellow().to_string(),
        _ => report.stop.to_string(),
    };
    println!(
        "Resumed at row {}, stopped on {}; next run starts at row {}",
        report.resumed_from, stop, report.next_row
    );
}
