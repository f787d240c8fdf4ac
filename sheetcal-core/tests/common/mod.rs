//! In-memory stand-ins for the sheet, the calendar and the clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sheetcal_core::{
    CalendarEvent, CalendarService, CellValue, ColumnRange, NewEvent, SheetCalError,
    SheetCalResult, SyncConfig, TabularSource,
};

/// Mid-2026, so rows dated 2025 are in the past.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap()
}

pub fn config() -> SyncConfig {
    let mut config = SyncConfig::new("team@group.calendar.google.com", "sheet-1");
    config.timezone = Some("UTC".to_string());
    config
}

pub fn at(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, day, hour, minute, 0).unwrap()
}

/// One sheet row using the default A..M column layout.
#[derive(Clone, Default)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Date, title and the four clock fields.
    pub fn event(date: &str, title: &str, start: (i64, i64), end: (i64, i64)) -> Self {
        Row {
            cells: vec![
                date.into(),
                title.into(),
                start.0.into(),
                start.1.into(),
                end.0.into(),
                end.1.into(),
            ],
        }
    }

    pub fn untitled(date: &str) -> Self {
        Row {
            cells: vec![
                date.into(),
                CellValue::Empty,
                9i64.into(),
                0i64.into(),
                10i64.into(),
                0i64.into(),
            ],
        }
    }

    /// Set the cell in column `letter` (A-M).
    pub fn set(mut self, letter: char, value: impl Into<CellValue>) -> Self {
        let index = (letter as u8 - b'A') as usize;
        if self.cells.len() <= index {
            self.cells.resize(index + 1, CellValue::Empty);
        }
        self.cells[index] = value.into();
        self
    }
}

/// A sheet held column-wise, answering reads the way a spreadsheet API
/// does: values from the requested start row, trailing blanks dropped.
#[derive(Clone, Default)]
pub struct FakeSheet {
    start_row: u32,
    columns: HashMap<String, Vec<CellValue>>,
    reads: Arc<Mutex<usize>>,
    broken: bool,
}

impl FakeSheet {
    pub fn new(start_row: u32, rows: &[Row]) -> Self {
        let mut columns: HashMap<String, Vec<CellValue>> = HashMap::new();
        for letter in b'A'..=b'M' {
            let index = (letter - b'A') as usize;
            let mut column: Vec<CellValue> = rows
                .iter()
                .map(|row| row.cells.get(index).cloned().unwrap_or_default())
                .collect();
            while column.last().is_some_and(CellValue::is_blank) {
                column.pop();
            }
            columns.insert((letter as char).to_string(), column);
        }
        Self {
            start_row,
            columns,
            reads: Arc::new(Mutex::new(0)),
            broken: false,
        }
    }

    /// Every read fails.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new(2, &[])
        }
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl TabularSource for FakeSheet {
    async fn read_column(&self, range: &ColumnRange) -> SheetCalResult<Vec<CellValue>> {
        *self.reads.lock().unwrap() += 1;
        if self.broken {
            return Err(SheetCalError::Read {
                range: range.to_string(),
                message: "Service Spreadsheets timed out".to_string(),
            });
        }

        let column = self.columns.get(&range.column).cloned().unwrap_or_default();
        let skip = range.start_row.saturating_sub(self.start_row) as usize;
        let take = (range.end_row - range.start_row + 1) as usize;
        Ok(column.into_iter().skip(skip).take(take).collect())
    }
}

#[derive(Default)]
struct CalendarState {
    events: Vec<(CalendarEvent, NewEvent)>,
    creates_left: Option<usize>,
    failing_titles: Vec<String>,
    query_error: Option<String>,
    query_quota_spent: bool,
    next_id: usize,
}

/// A calendar whose state is shared between clones, so a test can keep a
/// handle while the reconciler owns another.
#[derive(Clone, Default)]
pub struct FakeCalendar {
    state: Arc<Mutex<CalendarState>>,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `n` more creations, then answer with the daily quota error.
    pub fn quota_after(&self, n: usize) {
        self.state.lock().unwrap().creates_left = Some(n);
    }

    pub fn lift_quota(&self) {
        self.state.lock().unwrap().creates_left = None;
    }

    pub fn fail_title(&self, title: &str) {
        self.state.lock().unwrap().failing_titles.push(title.to_string());
    }

    pub fn fail_queries(&self, message: &str) {
        self.state.lock().unwrap().query_error = Some(message.to_string());
    }

    /// Every existence query answers with the daily quota error.
    pub fn spend_query_quota(&self) {
        self.state.lock().unwrap().query_quota_spent = true;
    }

    pub fn seed(&self, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        let event = NewEvent {
            title: title.to_string(),
            start,
            end,
            description: String::new(),
            color_id: String::new(),
        };
        self.insert(event);
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .map(|(event, _)| event.clone())
            .collect()
    }

    pub fn created(&self) -> Vec<NewEvent> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .map(|(_, new)| new.clone())
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.title).collect()
    }

    fn insert(&self, event: NewEvent) -> CalendarEvent {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let stored = CalendarEvent {
            id: format!("evt{}", state.next_id),
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            description: Some(event.description.clone()),
            color_id: Some(event.color_id.clone()),
        };
        state.events.push((stored.clone(), event));
        stored
    }
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn query_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        query: &str,
    ) -> SheetCalResult<Vec<CalendarEvent>> {
        let state = self.state.lock().unwrap();
        if state.query_quota_spent {
            return Err(SheetCalError::QuotaExceeded(
                "Service invoked too many times for one day: calendar.".to_string(),
            ));
        }
        if let Some(message) = &state.query_error {
            return Err(SheetCalError::Calendar(message.clone()));
        }
        Ok(state
            .events
            .iter()
            .map(|(event, _)| event)
            .filter(|e| e.start < end && e.end > start && e.title.contains(query))
            .cloned()
            .collect())
    }

    async fn create_event(&self, event: &NewEvent) -> SheetCalResult<CalendarEvent> {
        {
            let mut state = self.state.lock().unwrap();
            if state.failing_titles.iter().any(|t| event.title.ends_with(t.as_str())) {
                return Err(SheetCalError::Calendar(format!(
                    "Failed to create event: {}: 400 Bad Request",
                    event.title
                )));
            }
            if let Some(left) = state.creates_left.as_mut() {
                if *left == 0 {
                    return Err(SheetCalError::QuotaExceeded(
                        "Service invoked too many times for one day: calendar.".to_string(),
                    ));
                }
                *left -= 1;
            }
        }
        Ok(self.insert(event.clone()))
    }
}
