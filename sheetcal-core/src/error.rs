//! Error types for the sheetcal ecosystem.

use thiserror::Error;

/// Errors that can occur in sheetcal operations.
#[derive(Error, Debug)]
pub enum SheetCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {range}: {message}")]
    Read { range: String, message: String },

    #[error("Giving up on {range} after {attempts} attempts: {message}")]
    ExhaustedRetries {
        range: String,
        attempts: u32,
        message: String,
    },

    #[error("Calendar quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("State store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{name}' not found in PATH. Install it with:\n  cargo install {binary}")]
    ProviderNotInstalled { name: String, binary: String },

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for sheetcal operations.
pub type SheetCalResult<T> = Result<T, SheetCalError>;

/// Substrings calendar backends use when the daily request quota is spent.
const QUOTA_MARKERS: &[&str] = &[
    "Service invoked too many times for one day",
    "dailyLimitExceeded",
    "quotaExceeded",
];

/// Whether an API's own error text reports an exhausted daily quota.
///
/// Only pass the text the API produced. Messages that already carry
/// caller data (event titles, search terms) can contain these markers
/// without any quota being involved.
pub fn is_quota_message(message: &str) -> bool {
    QUOTA_MARKERS.iter().any(|marker| message.contains(marker))
}

impl SheetCalError {
    /// Whether this error means the calendar will refuse further writes today.
    ///
    /// Services classify quota failures where they see the raw API error;
    /// free-form messages are never inspected here.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, SheetCalError::QuotaExceeded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_markers_in_api_text() {
        assert!(is_quota_message(
            "Exception: Service invoked too many times for one day: calendar."
        ));
        assert!(is_quota_message("403 Forbidden: dailyLimitExceeded"));
        assert!(!is_quota_message("400 Bad Request: Invalid start time"));
    }

    #[test]
    fn test_only_the_quota_variant_is_quota() {
        assert!(SheetCalError::QuotaExceeded("Daily Limit Exceeded".to_string()).is_quota_exceeded());

        // A title that happens to contain a marker must not stop the run.
        let err = SheetCalError::Calendar(
            "Failed to create event: Event | quotaExceeded retro: 400 Bad Request".to_string(),
        );
        assert!(!err.is_quota_exceeded());
        assert!(!SheetCalError::Provider("403 Forbidden: dailyLimitExceeded".to_string()).is_quota_exceeded());
        assert!(!SheetCalError::Store("disk full".to_string()).is_quota_exceeded());
    }
}
