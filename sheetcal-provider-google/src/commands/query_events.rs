use anyhow::{Context, Result};
use google_calendar::types::OrderBy;
use sheetcal_core::CalendarEvent;
use sheetcal_core::protocol::QueryEvents;

use super::{api_error, parse_params};
use crate::convert::FromGoogle;
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<Vec<CalendarEvent>> {
    let cmd: QueryEvents = parse_params(params)?;
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let time_min = cmd.from.to_rfc3339();
    let time_max = cmd.to.to_rfc3339();

    let client = Session::load_valid(&config.google_account)
        .await?
        .client()?;

    let response = client
        .events()
        .list_all(
            &cmd.calendar_id,
            "",
            0,
            OrderBy::default(),
            &[],
            &cmd.query,
            &[],
            false,
            false,
            true, // single events
            &time_max,
            &time_min,
            "",
            "",
        )
        .await
        .map_err(|e| api_error(e, &cmd.query))
        .with_context(|| format!("Failed to query events matching '{}'", cmd.query))?;

    response
        .body
        .into_iter()
        .filter(|event| event.status != "cancelled")
        .map(CalendarEvent::from_google)
        .collect()
}
