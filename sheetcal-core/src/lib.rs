//! Core of the sheetcal ecosystem.
//!
//! This crate turns rows of a scheduling spreadsheet into calendar events:
//! - `source` / `retry` read columns with bounded, jittered retries
//! - `normalize` and `resolve` turn raw cells into a validated time interval
//! - `oracle` and `materialize` talk to the calendar
//! - `cursor` and `driver` make repeated runs resumable
//! - `protocol` / `provider` speak to provider binaries over stdin/stdout

pub mod calendar;
pub mod cell;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod materialize;
pub mod normalize;
pub mod oracle;
pub mod protocol;
pub mod provider;
pub mod resolve;
pub mod retry;
pub mod row;
pub mod source;

pub use calendar::{CalendarEvent, CalendarService, NewEvent};
pub use cell::CellValue;
pub use config::SyncConfig;
pub use cursor::{CursorStore, FileStore, KeyValueStore, MemoryStore};
pub use driver::{Reconciler, RunReport, StopReason};
pub use error::{SheetCalError, SheetCalResult};
pub use materialize::{MaterializeOutcome, Materializer};
pub use provider::{Provider, ProviderBackend};
pub use row::{Field, RawRow, SheetData};
pub use source::{ColumnRange, RangeReader, TabularSource};
