use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use sheetcal_core::CalendarEvent;

use super::FromGoogle;

impl FromGoogle<google_calendar::types::Event> for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let start = match event.start.as_ref().and_then(instant_from_google) {
            Some(start) => start,
            None => bail!("Event {} has no start time", event.id),
        };
        let end = match event.end.as_ref().and_then(instant_from_google) {
            Some(end) => end,
            None => bail!("Event {} has no end time", event.id),
        };

        Ok(CalendarEvent {
            id: event.id,
            title: event.summary,
            start,
            end,
            description: non_empty(event.description),
            color_id: non_empty(event.color_id),
        })
    }
}

/// All-day events count from midnight UTC; they never match a timed row.
fn instant_from_google(time: &google_calendar::types::EventDateTime) -> Option<DateTime<Utc>> {
    time.date_time
        .or_else(|| time.date.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()))
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
