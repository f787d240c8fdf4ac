//! Turning a raw row into an event candidate.

use chrono::{Datelike, NaiveDate};

use crate::row::{Field, RawRow};

/// Free-text fields carried into the event description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDetails {
    pub location: String,
    pub organizer: String,
    pub description: String,
    pub attendee_count: String,
    pub setup_type: String,
    pub furniture_requested: String,
    pub responsible_person: String,
}

/// Raw clock fields as entered in the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTimes {
    pub start_hour: Option<i64>,
    pub start_minute: Option<i64>,
    pub end_hour: Option<i64>,
    pub end_minute: Option<i64>,
}

/// A titled, dated row that still needs its times resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCandidate {
    pub row: u32,
    pub title: String,
    pub date: NaiveDate,
    pub times: RawTimes,
    pub details: EventDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingDate,
    UnreadableDate(String),
    PastYear(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Actionable(EventCandidate),
    SkipPast(SkipReason),
    /// No title: contiguous data has ended.
    Stop,
}

/// Classify one row.
///
/// The title is checked first: an untitled row ends the scan whatever else
/// it holds. Rows without a readable date, or dated before `current_year`,
/// are skipped.
pub fn normalize(raw: &RawRow, current_year: i32, date_formats: &[String]) -> Normalized {
    let title = raw.get(Field::Title);
    if title.is_blank() {
        return Normalized::Stop;
    }

    let date_cell = raw.get(Field::Date);
    if date_cell.is_blank() {
        return Normalized::SkipPast(SkipReason::MissingDate);
    }
    let Some(date) = date_cell.as_date(date_formats) else {
        return Normalized::SkipPast(SkipReason::UnreadableDate(date_cell.to_text()));
    };
    if date.year() < current_year {
        return Normalized::SkipPast(SkipReason::PastYear(date.year()));
    }

    let text = |field: Field| raw.get(field).to_text();
    let integer = |field: Field| raw.get(field).as_integer();

    Normalized::Actionable(EventCandidate {
        row: raw.row,
        title: title.to_text(),
        date,
        times: RawTimes {
            start_hour: integer(Field::StartHour),
            start_minute: integer(Field::StartMinute),
            end_hour: integer(Field::EndHour),
            end_minute: integer(Field::EndMinute),
        },
        details: EventDetails {
            location: text(Field::Location),
            organizer: text(Field::Organizer),
            description: text(Field::Description),
            attendee_count: text(Field::Attendees),
            setup_type: text(Field::SetupType),
            furniture_requested: text(Field::Furniture),
            responsible_person: text(Field::ResponsiblePerson),
        },
    })
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingDate => write!(f, "no date"),
            SkipReason::UnreadableDate(raw) => write!(f, "unreadable date '{raw}'"),
            SkipReason::PastYear(year) => write!(f, "dated in past year {year}"),
        }
    }
}
