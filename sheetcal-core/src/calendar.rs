//! Provider-neutral calendar types and the calendar collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SheetCalResult;

/// An event as the calendar reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
}

/// An event to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
    pub color_id: String,
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Events overlapping `[start, end)` whose text matches `query`.
    async fn query_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        query: &str,
    ) -> SheetCalResult<Vec<CalendarEvent>>;

    /// Create an event. Daily quota exhaustion must surface as
    /// `SheetCalError::QuotaExceeded`; any other variant is an ordinary failure.
    async fn create_event(&self, event: &NewEvent) -> SheetCalResult<CalendarEvent>;
}
