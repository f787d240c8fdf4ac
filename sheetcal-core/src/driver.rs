//! One reconciliation run over the sheet.
//!
//! Rows are handled strictly in order from the stored cursor. Each row ends
//! in one of: skipped, invalid, already on the calendar, created (or would
//! be, in a dry run), or failed. The cursor is written after every row so
//! an interrupted run picks up where it stopped.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};

use crate::calendar::CalendarService;
use crate::config::SyncConfig;
use crate::cursor::{CursorStore, KeyValueStore};
use crate::error::SheetCalResult;
use crate::materialize::{MaterializeOutcome, Materializer};
use crate::normalize::{Normalized, normalize};
use crate::resolve::resolve;
use crate::source::{RangeReader, TabularSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Row with an empty title. The cursor stays on it.
    BlankTitle(u32),
    /// The calendar refused writes. The cursor stays on this row.
    QuotaExceeded(u32),
    /// Every row with data was handled; the cursor went back to the start.
    EndOfData,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::BlankTitle(row) => write!(f, "blank title at row {row}"),
            StopReason::QuotaExceeded(row) => write!(f, "calendar quota exceeded at row {row}"),
            StopReason::EndOfData => write!(f, "end of data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub resumed_from: u32,
    pub next_row: u32,
    pub stop: StopReason,
    pub dry_run: bool,
    pub created: usize,
    pub already_existing: usize,
    pub would_create: usize,
    pub skipped_past: usize,
    pub invalid: usize,
    pub failed: usize,
}

impl RunReport {
    fn new(resumed_from: u32, dry_run: bool) -> Self {
        Self {
            resumed_from,
            next_row: resumed_from,
            stop: StopReason::EndOfData,
            dry_run,
            created: 0,
            already_existing: 0,
            would_create: 0,
            skipped_past: 0,
            invalid: 0,
            failed: 0,
        }
    }

    pub fn rows_handled(&self) -> usize {
        self.created
            + self.already_existing
            + self.would_create
            + self.skipped_past
            + self.invalid
            + self.failed
    }
}

pub struct Reconciler<'a, S, C> {
    config: &'a SyncConfig,
    reader: RangeReader<S>,
    calendar: C,
    cursor: CursorStore<'a>,
    materializer: Materializer,
}

impl<'a, S, C> Reconciler<'a, S, C>
where
    S: TabularSource,
    C: CalendarService,
{
    pub fn new(
        config: &'a SyncConfig,
        reader: RangeReader<S>,
        calendar: C,
        store: &'a dyn KeyValueStore,
    ) -> Self {
        Self {
            config,
            reader,
            calendar,
            cursor: CursorStore::new(store, config.cursor_key.clone(), config.start_row),
            materializer: Materializer::from_config(config),
        }
    }

    /// Read and report, but never create events or move the cursor.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.materializer = self.materializer.dry_run(dry_run);
        self
    }

    pub fn cursor(&self) -> &CursorStore<'a> {
        &self.cursor
    }

    pub async fn run(&self) -> SheetCalResult<RunReport> {
        self.run_at(Utc::now()).await
    }

    /// Run with `now` deciding which rows are in the past.
    pub async fn run_at(&self, now: DateTime<Utc>) -> SheetCalResult<RunReport> {
        let tz = self.config.tz()?;
        let current_year = now.with_timezone(&tz).year();
        let dry_run = self.materializer.dry_run;

        let resumed_from = self.cursor.load()?;
        log::info!("Resuming from row {resumed_from}.");

        let data = self.reader.read_sheet(self.config).await?;
        let end_row = data.end_row();
        let mut report = RunReport::new(resumed_from, dry_run);

        let mut row = resumed_from;
        while row < end_row {
            let raw = data.row(row);

            match normalize(&raw, current_year, &self.config.date_formats) {
                Normalized::Stop => {
                    log::info!("Row {row} has no title, stopping.");
                    report.stop = StopReason::BlankTitle(row);
                    report.next_row = row;
                    return Ok(report);
                }
                Normalized::SkipPast(reason) => {
                    log::info!("Skipping row {row}: {reason}");
                    report.skipped_past += 1;
                }
                Normalized::Actionable(candidate) => match resolve(&candidate, tz) {
                    Err(invalid) => {
                        log::warn!("Invalid event time in row {row}: {invalid}");
                        report.invalid += 1;
                    }
                    Ok(interval) => {
                        let outcome = self
                            .materializer
                            .materialize(&self.calendar, &candidate, &interval)
                            .await?;

                        match outcome {
                            MaterializeOutcome::Created { .. } => report.created += 1,
                            MaterializeOutcome::AlreadyExists => report.already_existing += 1,
                            MaterializeOutcome::WouldCreate => report.would_create += 1,
                            MaterializeOutcome::Failed(_) => report.failed += 1,
                            MaterializeOutcome::QuotaExceeded(reason) => {
                                log::error!(
                                    "API limit reached at row {row}, stopping: {reason}"
                                );
                                report.stop = StopReason::QuotaExceeded(row);
                                report.next_row = row;
                                return Ok(report);
                            }
                        }
                    }
                },
            }

            row += 1;
            report.next_row = row;
            if !dry_run {
                self.cursor.save(row)?;
            }
        }

        log::info!(
            "Reached the end of the data, next run starts at row {}.",
            self.cursor.start_row()
        );
        report.stop = StopReason::EndOfData;
        report.next_row = self.cursor.start_row();
        if !dry_run {
            self.cursor.reset()?;
        }

        Ok(report)
    }
}
