pub mod create_event;
pub mod query_events;
pub mod read_column;

use std::fmt;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use sheetcal_core::error::is_quota_message;

/// Decode a command's params.
pub fn parse_params<C: DeserializeOwned>(params: serde_json::Value) -> Result<C> {
    serde_json::from_value(params).context("Invalid params")
}

/// The calendar API reported its daily quota as spent.
#[derive(Debug)]
pub struct QuotaExceeded(pub String);

impl fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for QuotaExceeded {}

/// Classify a calendar API failure before any context is attached.
///
/// `echoed` is caller text the API may repeat back (a title or search
/// term), as is or URL-encoded in a request URL; it is cut out before
/// looking for quota markers.
pub fn api_error(err: impl fmt::Display, echoed: &str) -> anyhow::Error {
    let message = err.to_string();
    let own_text = strip_echoes(&message, echoed);

    if is_quota_message(&own_text) {
        anyhow::Error::new(QuotaExceeded(message))
    } else {
        anyhow::Error::msg(message)
    }
}

fn strip_echoes(message: &str, echoed: &str) -> String {
    if echoed.is_empty() {
        return message.to_string();
    }
    let form_encoded: String = url::form_urlencoded::byte_serialize(echoed.as_bytes()).collect();
    let percent_encoded = form_encoded.replace('+', "%20");

    [echoed, form_encoded.as_str(), percent_encoded.as_str()]
        .into_iter()
        .fold(message.to_string(), |text, echo| text.replace(echo, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_reason_from_api_is_flagged() {
        let err = api_error(
            "403 Forbidden: {\"reason\": \"dailyLimitExceeded\"}",
            "Event | Gala",
        );
        assert!(err.downcast_ref::<QuotaExceeded>().is_some());
    }

    #[test]
    fn test_echoed_title_is_not_a_quota_reason() {
        let err = api_error(
            "400 Bad Request: invalid event Event | quotaExceeded retro",
            "Event | quotaExceeded retro",
        );
        assert!(err.downcast_ref::<QuotaExceeded>().is_none());
        assert!(err.to_string().contains("quotaExceeded retro"));
    }

    #[test]
    fn test_echoed_query_in_request_url_is_ignored() {
        let err = api_error(
            "error sending request for url (https://www.googleapis.com/calendar/v3/calendars/c/events?q=Event+%7C+quotaExceeded+retro)",
            "Event | quotaExceeded retro",
        );
        assert!(err.downcast_ref::<QuotaExceeded>().is_none());
    }
}
