//! Creating calendar events for resolved candidates.

use std::fmt::Write as _;

use crate::calendar::{CalendarService, NewEvent};
use crate::config::SyncConfig;
use crate::error::{SheetCalError, SheetCalResult};
use crate::normalize::{EventCandidate, EventDetails};
use crate::oracle;
use crate::resolve::ResolvedInterval;

#[derive(Debug, Clone, PartialEq)]
pub enum MaterializeOutcome {
    Created { id: String },
    AlreadyExists,
    /// Dry run: the event is absent and would have been created.
    WouldCreate,
    /// The calendar refused the write for today. Fatal for the run.
    QuotaExceeded(String),
    /// Any other creation error. The row is given up on.
    Failed(String),
}

/// Settings applied to every created event.
#[derive(Debug, Clone)]
pub struct Materializer {
    pub prefix: String,
    pub color_id: String,
    pub dry_run: bool,
}

impl Materializer {
    pub fn new(prefix: impl Into<String>, color_id: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            color_id: color_id.into(),
            dry_run: false,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.event_prefix.clone(), config.color_id.clone())
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn title_for(&self, title: &str) -> String {
        format!("{} {}", self.prefix, title)
    }

    /// Make sure `candidate` is on the calendar at `interval`.
    ///
    /// Errors from the existence check are returned as `Err` unless they
    /// report quota exhaustion; creation errors never are.
    pub async fn materialize<C>(
        &self,
        calendar: &C,
        candidate: &EventCandidate,
        interval: &ResolvedInterval,
    ) -> SheetCalResult<MaterializeOutcome>
    where
        C: CalendarService + ?Sized,
    {
        let title = self.title_for(&candidate.title);

        match oracle::exists(calendar, interval, &title).await {
            Ok(true) => {
                log::info!(
                    "Event already exists: {} between {} and {}",
                    title,
                    interval.start,
                    interval.end
                );
                return Ok(MaterializeOutcome::AlreadyExists);
            }
            Ok(false) => {}
            Err(e) if e.is_quota_exceeded() => {
                return Ok(MaterializeOutcome::QuotaExceeded(quota_text(e)));
            }
            Err(e) => return Err(e),
        }

        if self.dry_run {
            log::info!(
                "Would create: {} from {} to {}",
                title,
                interval.start,
                interval.end
            );
            return Ok(MaterializeOutcome::WouldCreate);
        }

        let event = NewEvent {
            title,
            start: interval.start,
            end: interval.end,
            description: describe(&candidate.details),
            color_id: self.color_id.clone(),
        };

        match calendar.create_event(&event).await {
            Ok(created) => {
                log::info!(
                    "Event created: {} from {} to {}",
                    event.title,
                    event.start,
                    event.end
                );
                Ok(MaterializeOutcome::Created { id: created.id })
            }
            Err(e) if e.is_quota_exceeded() => Ok(MaterializeOutcome::QuotaExceeded(quota_text(e))),
            Err(e) => {
                log::warn!("Error creating event: {} - {}", event.title, e);
                Ok(MaterializeOutcome::Failed(e.to_string()))
            }
        }
    }
}

fn quota_text(e: SheetCalError) -> String {
    match e {
        SheetCalError::QuotaExceeded(msg) => msg,
        other => other.to_string(),
    }
}

/// The labeled description block, one `<b>Label:</b> value` line per field.
pub fn describe(details: &EventDetails) -> String {
    let lines = [
        ("Location", &details.location),
        ("Organizer", &details.organizer),
        ("Description", &details.description),
        ("Attendees", &details.attendee_count),
        ("Setup Type", &details.setup_type),
        ("Furniture Requested", &details.furniture_requested),
        ("Responsible Person", &details.responsible_person),
    ];

    let mut out = String::new();
    for (label, value) in lines {
        let _ = writeln!(out, "<b>{label}:</b> {value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_block_order_and_format() {
        let details = EventDetails {
            location: "Room 4".to_string(),
            organizer: "Ana".to_string(),
            attendee_count: "30".to_string(),
            ..Default::default()
        };

        assert_eq!(
            describe(&details),
            "<b>Location:</b> Room 4\n\
             <b>Organizer:</b> Ana\n\
             <b>Description:</b> \n\
             <b>Attendees:</b> 30\n\
             <b>Setup Type:</b> \n\
             <b>Furniture Requested:</b> \n\
             <b>Responsible Person:</b> \n"
        );
    }

    #[test]
    fn test_title_uses_prefix() {
        let m = Materializer::new("Event |", "3");
        assert_eq!(m.title_for("Chess Club"), "Event | Chess Club");
    }
}
