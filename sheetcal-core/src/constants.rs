/// Marks every event this tool creates; the title is `"{prefix} {row title}"`.
pub const DEFAULT_EVENT_PREFIX: &str = "Event |";

/// Google Calendar color id applied to created events.
pub const DEFAULT_COLOR_ID: &str = "3";

/// First data row (row 1 holds the headers).
pub const DEFAULT_START_ROW: u32 = 2;

pub const DEFAULT_END_ROW: u32 = 1000;

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Key under which the cursor is kept in the state store.
pub const DEFAULT_CURSOR_KEY: &str = "lastProcessedRow";

pub const DEFAULT_PROVIDER: &str = "google";

/// Attempts per column read before giving up.
pub const MAX_READ_ATTEMPTS: u32 = 5;

/// Serial day numbers count from this date (spreadsheet epoch).
pub const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
