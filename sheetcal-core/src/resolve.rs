//! Resolving hour/minute cells into a start/end interval.
//!
//! Sheet times are typed by hand and often drift between 12- and 24-hour
//! notation. The resolver runs a fixed pipeline of pure steps over a
//! [`Draft`]; each step either returns the (possibly corrected) draft or an
//! [`InvalidTime`] that ends the pipeline.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::normalize::{EventCandidate, RawTimes};

/// Start hours below this are taken to be afternoon hours typed as AM.
const EARLY_START_CUTOFF: i64 = 6;

/// A validated interval, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ResolvedInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// 0 <= start hour < 6 moved 12 hours later.
    StartShiftedToAfternoon { from: i64 },
    /// Morning end hour before the start hour moved 12 hours later.
    EndShiftedToAfternoon { from: i64 },
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correction::StartShiftedToAfternoon { from } => {
                write!(f, "start hour {from} read as {}", from + 12)
            }
            Correction::EndShiftedToAfternoon { from } => {
                write!(f, "end hour {from} read as {}", from + 12)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTime {
    #[error("missing time data: {}", describe(.0))]
    Missing(RawTimes),

    #[error("{hour}:{minute:02} is not a time of day")]
    OutOfRange { hour: i64, minute: i64 },

    #[error("start {start} is not before end {end}, even after correction")]
    NotAfterStart { start: NaiveDateTime, end: NaiveDateTime },

    #[error("{time} does not exist in {zone}")]
    NonexistentLocalTime { time: NaiveDateTime, zone: String },
}

fn describe(times: &RawTimes) -> String {
    let show = |value: Option<i64>| value.map_or_else(|| "?".to_string(), |v| v.to_string());
    format!(
        "start={}:{}, end={}:{}",
        show(times.start_hour),
        show(times.start_minute),
        show(times.end_hour),
        show(times.end_minute)
    )
}

/// Clock fields being worked on, plus the corrections applied so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub date: NaiveDate,
    pub start_hour: i64,
    pub start_minute: i64,
    pub end_hour: i64,
    pub end_minute: i64,
    pub corrections: Vec<Correction>,
}

impl Draft {
    /// All four clock fields are required.
    pub fn from_candidate(candidate: &EventCandidate) -> Result<Self, InvalidTime> {
        let t = candidate.times;
        match (t.start_hour, t.start_minute, t.end_hour, t.end_minute) {
            (Some(start_hour), Some(start_minute), Some(end_hour), Some(end_minute)) => Ok(Draft {
                date: candidate.date,
                start_hour,
                start_minute,
                end_hour,
                end_minute,
                corrections: Vec::new(),
            }),
            _ => Err(InvalidTime::Missing(t)),
        }
    }

    pub fn start(&self) -> Result<NaiveDateTime, InvalidTime> {
        wall_clock(self.date, self.start_hour, self.start_minute)
    }

    pub fn end(&self) -> Result<NaiveDateTime, InvalidTime> {
        wall_clock(self.date, self.end_hour, self.end_minute)
    }
}

fn wall_clock(date: NaiveDate, hour: i64, minute: i64) -> Result<NaiveDateTime, InvalidTime> {
    let time = u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .ok_or(InvalidTime::OutOfRange { hour, minute })?;
    Ok(date.and_time(time))
}

type Step = fn(Draft) -> Result<Draft, InvalidTime>;

/// Applied in order.
const STEPS: [Step; 3] = [shift_early_start, shift_inverted_end, require_ordered];

/// Small start hours are afternoon starts typed without the 12.
pub fn shift_early_start(mut draft: Draft) -> Result<Draft, InvalidTime> {
    if (0..EARLY_START_CUTOFF).contains(&draft.start_hour) {
        draft.corrections.push(Correction::StartShiftedToAfternoon {
            from: draft.start_hour,
        });
        draft.start_hour += 12;
    }
    Ok(draft)
}

/// An end at or before the start gets one chance: a morning end hour that
/// is below the start hour is moved to the afternoon.
pub fn shift_inverted_end(mut draft: Draft) -> Result<Draft, InvalidTime> {
    if draft.start()? >= draft.end()?
        && draft.end_hour < draft.start_hour
        && draft.end_hour < 12
    {
        draft.corrections.push(Correction::EndShiftedToAfternoon {
            from: draft.end_hour,
        });
        draft.end_hour += 12;
    }
    Ok(draft)
}

pub fn require_ordered(draft: Draft) -> Result<Draft, InvalidTime> {
    let (start, end) = (draft.start()?, draft.end()?);
    if start < end {
        Ok(draft)
    } else {
        Err(InvalidTime::NotAfterStart { start, end })
    }
}

/// Ambiguous times take the earlier offset; times skipped by a clock change
/// are invalid. After the afternoon shifts, the usual 00:00-03:00 transition
/// window only comes through here for zones that change clocks later in the day.
fn localize(time: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, InvalidTime> {
    tz.from_local_datetime(&time)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| InvalidTime::NonexistentLocalTime {
            time,
            zone: tz.name().to_string(),
        })
}

/// Resolve a candidate's clock fields to an interval in `tz`.
///
/// Corrections are logged as they are applied.
pub fn resolve(candidate: &EventCandidate, tz: Tz) -> Result<ResolvedInterval, InvalidTime> {
    let mut draft = Draft::from_candidate(candidate)?;

    for step in STEPS {
        let applied = draft.corrections.len();
        draft = step(draft)?;
        for correction in &draft.corrections[applied..] {
            log::info!("Correcting format: row {} {}", candidate.row, correction);
        }
    }

    let (start, end) = (draft.start()?, draft.end()?);
    let (start_utc, end_utc) = (localize(start, tz)?, localize(end, tz)?);

    ResolvedInterval::new(start_utc, end_utc).ok_or(InvalidTime::NotAfterStart { start, end })
}
