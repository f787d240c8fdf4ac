use anyhow::Result;
use sheetcal_core::CellValue;
use sheetcal_core::protocol::ReadColumn;

use super::parse_params;
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;
use crate::sheets;

pub async fn handle(params: serde_json::Value) -> Result<Vec<CellValue>> {
    let cmd: ReadColumn = parse_params(params)?;
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let session = Session::load_valid(&config.google_account).await?;

    sheets::read_column(session.access_token(), &cmd.spreadsheet_id, &cmd.range).await
}
