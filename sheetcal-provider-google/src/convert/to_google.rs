use chrono::{DateTime, Utc};
use sheetcal_core::NewEvent;

use super::ToGoogle;

impl ToGoogle<google_calendar::types::Event> for NewEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            summary: self.title.clone(),
            description: self.description.clone(),
            start: Some(instant_to_google(self.start)),
            end: Some(instant_to_google(self.end)),
            color_id: self.color_id.clone(),
            ..Default::default()
        }
    }
}

fn instant_to_google(instant: DateTime<Utc>) -> google_calendar::types::EventDateTime {
    google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(instant),
        time_zone: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_event_fields() {
        let event = NewEvent {
            title: "Event | Gala".to_string(),
            start: Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 5, 1, 22, 0, 0).unwrap(),
            description: "<b>Location:</b> Hall\n".to_string(),
            color_id: "3".to_string(),
        };

        let google = event.to_google();
        assert_eq!(google.summary, "Event | Gala");
        assert_eq!(google.color_id, "3");
        assert!(google.id.is_empty());
        assert_eq!(
            google.start.and_then(|s| s.date_time),
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap())
        );
    }
}
