//! Sync configuration at ~/.config/sheetcal/config.toml

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLOR_ID, DEFAULT_CURSOR_KEY, DEFAULT_END_ROW, DEFAULT_EVENT_PREFIX, DEFAULT_PROVIDER,
    DEFAULT_SHEET_NAME, DEFAULT_START_ROW,
};
use crate::error::{SheetCalError, SheetCalResult};
use crate::row::Field;
use crate::source::ColumnRange;

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

fn default_start_row() -> u32 {
    DEFAULT_START_ROW
}

fn default_end_row() -> u32 {
    DEFAULT_END_ROW
}

fn default_event_prefix() -> String {
    DEFAULT_EVENT_PREFIX.to_string()
}

fn default_color_id() -> String {
    DEFAULT_COLOR_ID.to_string()
}

fn default_cursor_key() -> String {
    DEFAULT_CURSOR_KEY.to_string()
}

fn default_date_formats() -> Vec<String> {
    vec![
        "%Y-%m-%d".to_string(),
        "%m/%d/%Y".to_string(),
        "%Y/%m/%d".to_string(),
    ]
}

/// Everything one sync run needs to know, fixed at configuration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Calendar that receives the events
    pub calendar_id: String,

    /// Spreadsheet holding the schedule
    pub spreadsheet_id: String,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// First data row (1-based)
    #[serde(default = "default_start_row")]
    pub start_row: u32,

    /// Last row read from each column
    #[serde(default = "default_end_row")]
    pub end_row: u32,

    /// IANA zone the sheet's wall-clock times are in (defaults to the system zone)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_event_prefix")]
    pub event_prefix: String,

    #[serde(default = "default_color_id")]
    pub color_id: String,

    /// chrono formats tried, in order, for text date cells
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    #[serde(default = "default_cursor_key")]
    pub cursor_key: String,

    /// Where the cursor lives (defaults to ~/.local/share/sheetcal/state.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    #[serde(default)]
    pub columns: ColumnMap,

    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Column letter for each field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub title: String,
    pub start_hour: String,
    pub start_minute: String,
    pub end_hour: String,
    pub end_minute: String,
    pub location: String,
    pub organizer: String,
    pub description: String,
    pub attendees: String,
    pub setup_type: String,
    pub furniture: String,
    pub responsible_person: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "A".to_string(),
            title: "B".to_string(),
            start_hour: "C".to_string(),
            start_minute: "D".to_string(),
            end_hour: "E".to_string(),
            end_minute: "F".to_string(),
            location: "G".to_string(),
            organizer: "H".to_string(),
            description: "I".to_string(),
            attendees: "J".to_string(),
            setup_type: "K".to_string(),
            furniture: "L".to_string(),
            responsible_person: "M".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn letter(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Title => &self.title,
            Field::StartHour => &self.start_hour,
            Field::StartMinute => &self.start_minute,
            Field::EndHour => &self.end_hour,
            Field::EndMinute => &self.end_minute,
            Field::Location => &self.location,
            Field::Organizer => &self.organizer,
            Field::Description => &self.description,
            Field::Attendees => &self.attendees,
            Field::SetupType => &self.setup_type,
            Field::Furniture => &self.furniture,
            Field::ResponsiblePerson => &self.responsible_person,
        }
    }
}

/// Which provider binary to use, plus provider-specific parameters
/// (e.g. `google_account`) passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

fn default_provider_name() -> String {
    DEFAULT_PROVIDER.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            params: serde_json::Map::new(),
        }
    }
}

impl SyncConfig {
    pub fn new(calendar_id: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: default_sheet_name(),
            start_row: default_start_row(),
            end_row: default_end_row(),
            timezone: None,
            event_prefix: default_event_prefix(),
            color_id: default_color_id(),
            date_formats: default_date_formats(),
            cursor_key: default_cursor_key(),
            state_file: None,
            columns: ColumnMap::default(),
            provider: ProviderConfig::default(),
        }
    }

    /// ~/.config/sheetcal/config.toml
    pub fn default_path() -> SheetCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SheetCalError::Config("Could not determine config directory".into()))?
            .join("sheetcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> SheetCalResult<Self> {
        if !path.exists() {
            return Err(SheetCalError::Config(format!(
                "Config file not found at {}\nRun `sheetcal init` to create one.",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SheetCalError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        let config: SyncConfig = toml::from_str(&contents).map_err(|e| {
            SheetCalError::Config(format!("Could not parse {}: {e}", path.display()))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SheetCalResult<()> {
        if self.calendar_id.trim().is_empty() {
            return Err(SheetCalError::Config("calendar_id must not be empty".into()));
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(SheetCalError::Config("spreadsheet_id must not be empty".into()));
        }
        if self.start_row == 0 {
            return Err(SheetCalError::Config("start_row is 1-based".into()));
        }
        if self.end_row < self.start_row {
            return Err(SheetCalError::Config(format!(
                "end_row ({}) is before start_row ({})",
                self.end_row, self.start_row
            )));
        }
        for field in Field::ALL {
            let letter = self.columns.letter(field);
            if letter.is_empty() || !letter.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(SheetCalError::Config(format!(
                    "Column for {} must be letters A-Z, got '{letter}'",
                    field.name()
                )));
            }
        }
        if let Some(tz) = &self.timezone {
            Tz::from_str(tz)
                .map_err(|_| SheetCalError::Config(format!("Unknown time zone '{tz}'")))?;
        }
        Ok(())
    }

    /// Zone for the sheet's wall-clock times.
    pub fn tz(&self) -> SheetCalResult<Tz> {
        if let Some(name) = &self.timezone {
            return Tz::from_str(name)
                .map_err(|_| SheetCalError::Config(format!("Unknown time zone '{name}'")));
        }

        match iana_time_zone::get_timezone()
            .ok()
            .and_then(|name| Tz::from_str(&name).ok())
        {
            Some(tz) => Ok(tz),
            None => {
                log::debug!("Could not detect the system time zone, using UTC");
                Ok(Tz::UTC)
            }
        }
    }

    /// Range covering `field` from `start_row` to `end_row`.
    pub fn range_for(&self, field: Field) -> ColumnRange {
        ColumnRange {
            sheet_name: self.sheet_name.clone(),
            column: self.columns.letter(field).to_string(),
            start_row: self.start_row,
            end_row: self.end_row,
        }
    }

    /// ~/.local/share/sheetcal/state.json unless `state_file` says otherwise.
    pub fn state_path(&self) -> SheetCalResult<PathBuf> {
        if let Some(path) = &self.state_file {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SheetCalError::Config("Could not determine data directory".into()))?;
        Ok(data_dir.join("sheetcal").join("state.json"))
    }

    /// Write a starter config with the optional keys commented out.
    pub fn create_default_config(path: &Path) -> SheetCalResult<()> {
        let contents = format!(
            "\
# sheetcal configuration

calendar_id = \"YOUR_CALENDAR_ID@group.calendar.google.com\"
spreadsheet_id = \"YOUR_SPREADSHEET_ID\"

# sheet_name = \"{DEFAULT_SHEET_NAME}\"
# start_row = {DEFAULT_START_ROW}
# end_row = {DEFAULT_END_ROW}
# timezone = \"America/New_York\"
# event_prefix = \"{DEFAULT_EVENT_PREFIX}\"
# color_id = \"{DEFAULT_COLOR_ID}\"

# [columns]
# date = \"A\"
# title = \"B\"
# start_hour = \"C\"
# start_minute = \"D\"
# end_hour = \"E\"
# end_minute = \"F\"
# location = \"G\"
# organizer = \"H\"
# description = \"I\"
# attendees = \"J\"
# setup_type = \"K\"
# furniture = \"L\"
# responsible_person = \"M\"

[provider]
name = \"{DEFAULT_PROVIDER}\"
google_account = \"you@example.com\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SheetCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SheetCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
