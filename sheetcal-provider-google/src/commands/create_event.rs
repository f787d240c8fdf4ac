use anyhow::{Context, Result};
use google_calendar::types::SendUpdates;
use sheetcal_core::CalendarEvent;
use sheetcal_core::protocol::CreateEvent;

use super::{api_error, parse_params};
use crate::convert::{FromGoogle, ToGoogle};
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<CalendarEvent> {
    let cmd: CreateEvent = parse_params(params)?;
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let client = Session::load_valid(&config.google_account)
        .await?
        .client()?;

    let google_event = cmd.event.to_google();

    let response = client
        .events()
        .insert(
            &cmd.calendar_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .map_err(|e| api_error(e, &google_event.summary))
        .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

    CalendarEvent::from_google(response.body)
}
