//! Defines the JSON protocol used for communication between sheetcal
//! and provider binaries over stdin/stdout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::calendar::{CalendarEvent, NewEvent};
use crate::cell::CellValue;
use crate::source::ColumnRange;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ReadColumn,
    QueryEvents,
    CreateEvent,
}

/// Request sent from sheetcal to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Lets the caller tell a spent quota apart from any other failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[default]
    Other,
    QuotaExceeded,
}

/// Response sent from provider to sheetcal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success {
        data: T,
    },
    Error {
        error: String,
        #[serde(default)]
        kind: ErrorKind,
    },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Response::Success { data })
    }
}

impl Response<()> {
    pub fn error(msg: &str, kind: ErrorKind) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Response::<()>::Error {
            error: msg.to_string(),
            kind,
        })
    }
}

/// Read one column of the spreadsheet.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadColumn {
    /// Provider-specific config (e.g. google_account)
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub spreadsheet_id: String,
    pub range: ColumnRange,
}

impl ProviderCommand for ReadColumn {
    type Response = Vec<CellValue>;
    fn command() -> Command {
        Command::ReadColumn
    }
}

/// List events overlapping a time range whose text matches `query`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryEvents {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub query: String,
}

impl ProviderCommand for QueryEvents {
    type Response = Vec<CalendarEvent>;
    fn command() -> Command {
        Command::QueryEvents
    }
}

/// Create a new event.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub event: NewEvent,
}

impl ProviderCommand for CreateEvent {
    type Response = CalendarEvent;
    fn command() -> Command {
        Command::CreateEvent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_defaults_to_other() {
        let response: Response<()> =
            serde_json::from_str(r#"{"status":"error","error":"boom"}"#).unwrap();
        match response {
            Response::Error { error, kind } => {
                assert_eq!(error, "boom");
                assert_eq!(kind, ErrorKind::Other);
            }
            Response::Success { .. } => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_quota_error_wire_format() {
        let json = Response::error("dailyLimitExceeded", ErrorKind::QuotaExceeded).unwrap();
        assert_eq!(
            json,
            r#"{"status":"error","error":"dailyLimitExceeded","kind":"quota_exceeded"}"#
        );
    }

    #[test]
    fn test_read_column_params_flatten_remote_config() {
        let mut remote_config = serde_json::Map::new();
        remote_config.insert("google_account".into(), "ops@example.com".into());

        let params = serde_json::to_value(ReadColumn {
            remote_config,
            spreadsheet_id: "sheet-1".to_string(),
            range: ColumnRange {
                sheet_name: "Sheet1".to_string(),
                column: "B".to_string(),
                start_row: 2,
                end_row: 1000,
            },
        })
        .unwrap();

        assert_eq!(params["google_account"], "ops@example.com");
        assert_eq!(params["range"]["column"], "B");
        assert_eq!(params["spreadsheet_id"], "sheet-1");
    }
}
