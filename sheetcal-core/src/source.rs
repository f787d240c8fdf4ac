//! Reading columns from the tabular source.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::config::SyncConfig;
use crate::error::SheetCalResult;
use crate::retry::RetryPolicy;
use crate::row::{Field, SheetData};

/// A single-column range, e.g. `Sheet1!B2:B1000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub sheet_name: String,
    pub column: String,
    pub start_row: u32,
    pub end_row: u32,
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}:{}{}",
            self.sheet_name, self.column, self.start_row, self.column, self.end_row
        )
    }
}

/// Something that can hand back one column of cells.
///
/// Values come back in row order starting at `range.start_row`. Trailing
/// empty cells may be dropped.
#[async_trait]
pub trait TabularSource: Send + Sync {
    async fn read_column(&self, range: &ColumnRange) -> SheetCalResult<Vec<CellValue>>;
}

/// Wraps a source with a retry policy.
pub struct RangeReader<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: TabularSource> RangeReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read one range, retrying transient failures. Each call gets a fresh
    /// attempt budget.
    pub async fn read(&self, range: &ColumnRange) -> SheetCalResult<Vec<CellValue>> {
        let what = range.to_string();
        self.policy
            .run(&what, || self.source.read_column(range))
            .await
    }

    /// Read every mapped column and align them by row.
    pub async fn read_sheet(&self, config: &SyncConfig) -> SheetCalResult<SheetData> {
        let mut data = SheetData::new(config.start_row);

        for field in Field::ALL {
            let values = self.read(&config.range_for(field)).await?;
            log::debug!("Read {} cells for {}", values.len(), field.name());
            data.insert_column(field, values);
        }

        Ok(data)
    }
}
