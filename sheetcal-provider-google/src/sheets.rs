//! Minimal Google Sheets API v4 client: reading one column.

use anyhow::{Context, Result};
use serde::Deserialize;
use sheetcal_core::{CellValue, ColumnRange};
use url::Url;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Body of `spreadsheets.values.get`. `values` is absent when the range
/// holds no data.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<CellValue>>,
}

/// A1 notation, quoting sheet names that need it (`'Q3 Bookings'!B2:B1000`).
pub fn a1_notation(range: &ColumnRange) -> String {
    let needs_quotes = !range
        .sheet_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if needs_quotes {
        let escaped = range.sheet_name.replace('\'', "''");
        format!(
            "'{}'!{}{}:{}{}",
            escaped, range.column, range.start_row, range.column, range.end_row
        )
    } else {
        range.to_string()
    }
}

pub fn values_url(spreadsheet_id: &str, range: &ColumnRange) -> Result<Url> {
    let mut url = Url::parse(SHEETS_API)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Sheets API URL cannot be a base"))?
        .push(spreadsheet_id)
        .push("values")
        .push(&a1_notation(range));

    url.query_pairs_mut()
        .append_pair("majorDimension", "COLUMNS")
        .append_pair("valueRenderOption", "UNFORMATTED_VALUE")
        .append_pair("dateTimeRenderOption", "SERIAL_NUMBER");

    Ok(url)
}

/// Cells of the single column in `range`, top to bottom.
pub async fn read_column(
    access_token: &str,
    spreadsheet_id: &str,
    range: &ColumnRange,
) -> Result<Vec<CellValue>> {
    let url = values_url(spreadsheet_id, range)?;

    let resp = reqwest::Client::new()
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .with_context(|| format!("Failed to send read request for {}", range))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let error_text = resp.text().await.unwrap_or_default();
        anyhow::bail!("Failed to read {}: {} {}", range, status, error_text);
    }

    let body = resp
        .text()
        .await
        .with_context(|| format!("Failed to read response body for {}", range))?;

    parse_values(&body).with_context(|| format!("Failed to parse values for {}", range))
}

pub fn parse_values(body: &str) -> Result<Vec<CellValue>> {
    let value_range: ValueRange = serde_json::from_str(body)?;
    Ok(value_range.values.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sheet: &str) -> ColumnRange {
        ColumnRange {
            sheet_name: sheet.to_string(),
            column: "B".to_string(),
            start_row: 2,
            end_row: 1000,
        }
    }

    #[test]
    fn test_a1_notation_quotes_when_needed() {
        assert_eq!(a1_notation(&range("Sheet1")), "Sheet1!B2:B1000");
        assert_eq!(a1_notation(&range("Q3 Bookings")), "'Q3 Bookings'!B2:B1000");
        assert_eq!(a1_notation(&range("Ana's")), "'Ana''s'!B2:B1000");
    }

    #[test]
    fn test_values_url() {
        let url = values_url("abc123", &range("Sheet1")).unwrap();
        assert!(url.as_str().starts_with(
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sheet1!B2:B1000?"
        ));
        assert!(url.as_str().contains("majorDimension=COLUMNS"));
        assert!(url.as_str().contains("valueRenderOption=UNFORMATTED_VALUE"));
    }

    #[test]
    fn test_parse_values_column() {
        let cells = parse_values(
            r#"{"range":"Sheet1!A2:A1000","majorDimension":"COLUMNS","values":[[46000, "", "Gala", true]]}"#,
        )
        .unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Number(46000.0),
                CellValue::from(""),
                CellValue::from("Gala"),
                CellValue::Bool(true),
            ]
        );
    }

    #[test]
    fn test_parse_values_empty_range() {
        let cells =
            parse_values(r#"{"range":"Sheet1!N2:N1000","majorDimension":"COLUMNS"}"#).unwrap();
        assert!(cells.is_empty());
    }
}
