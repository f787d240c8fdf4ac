//! Deciding whether an event is already on the calendar.

use crate::calendar::{CalendarEvent, CalendarService};
use crate::error::SheetCalResult;
use crate::resolve::ResolvedInterval;

/// Exact match only: same title, same start and end to the millisecond.
pub fn matches(event: &CalendarEvent, title: &str, interval: &ResolvedInterval) -> bool {
    event.title == title
        && event.start.timestamp_millis() == interval.start.timestamp_millis()
        && event.end.timestamp_millis() == interval.end.timestamp_millis()
}

/// Whether `calendar` already holds an event titled `title` (prefix
/// included) spanning exactly `interval`.
pub async fn exists<C>(calendar: &C, interval: &ResolvedInterval, title: &str) -> SheetCalResult<bool>
where
    C: CalendarService + ?Sized,
{
    let events = calendar
        .query_events(interval.start, interval.end, title)
        .await?;

    log::debug!(
        "{} event(s) overlap {} - {} matching '{}'",
        events.len(),
        interval.start,
        interval.end,
        title
    );

    Ok(events.iter().any(|event| matches(event, title, interval)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn interval() -> ResolvedInterval {
        ResolvedInterval::new(
            Utc.with_ymd_and_hms(2026, 3, 14, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 14, 16, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn event(title: &str, interval: &ResolvedInterval) -> CalendarEvent {
        CalendarEvent {
            id: "evt1".to_string(),
            title: title.to_string(),
            start: interval.start,
            end: interval.end,
            description: None,
            color_id: None,
        }
    }

    #[test]
    fn test_exact_event_matches() {
        let iv = interval();
        assert!(matches(&event("Event | Pi Day", &iv), "Event | Pi Day", &iv));
    }

    #[test]
    fn test_title_must_match_verbatim() {
        let iv = interval();
        assert!(!matches(&event("Event | Pi Day (moved)", &iv), "Event | Pi Day", &iv));
        assert!(!matches(&event("event | pi day", &iv), "Event | Pi Day", &iv));
    }

    #[test]
    fn test_one_minute_off_is_not_a_match() {
        let iv = interval();
        let mut shifted = event("Event | Pi Day", &iv);
        shifted.start += Duration::minutes(1);
        assert!(!matches(&shifted, "Event | Pi Day", &iv));

        let mut longer = event("Event | Pi Day", &iv);
        longer.end += Duration::minutes(1);
        assert!(!matches(&longer, "Event | Pi Day", &iv));
    }

    #[test]
    fn test_sub_millisecond_difference_still_matches() {
        let iv = interval();
        let mut drift = event("Event | Pi Day", &iv);
        drift.start += Duration::microseconds(400);
        assert!(matches(&drift, "Event | Pi Day", &iv));
    }
}
