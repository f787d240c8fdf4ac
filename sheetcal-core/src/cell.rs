//! Raw cell values as they come out of a spreadsheet.

use chrono::{DateTime, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::SERIAL_EPOCH;

/// One cell of a column read.
///
/// Sheets hand back loosely typed values: a time column may hold `14` or
/// `"14"`, a date column a serial day number or a formatted string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Number(_) => false,
        }
    }

    /// Display form of the cell, trimmed. Integral numbers print without a fraction.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        }
    }

    /// Integer reading of the cell, truncating toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            CellValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .map(|n| n.trunc() as i64)
                })
            }
            _ => None,
        }
    }

    /// Calendar date held by the cell.
    ///
    /// Numbers are serial day numbers; text is tried as RFC 3339 first and
    /// then against each of `formats` in order.
    pub fn as_date(&self, formats: &[String]) -> Option<NaiveDate> {
        match self {
            CellValue::Number(n) => serial_to_date(*n),
            CellValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    return Some(dt.date_naive());
                }
                formats
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            }
            _ => None,
        }
    }
}

/// Convert a spreadsheet serial day number (fraction = time of day) to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.trunc() as u64))
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        vec!["%Y-%m-%d".to_string(), "%m/%d/%Y".to_string()]
    }

    #[test]
    fn test_deserialize_mixed_column() {
        let cells: Vec<CellValue> = serde_json::from_str(r#"[null, 14, "30", true, ""]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Empty,
                CellValue::Number(14.0),
                CellValue::Text("30".to_string()),
                CellValue::Bool(true),
                CellValue::Text(String::new()),
            ]
        );
    }

    #[test]
    fn test_integer_from_number_and_text() {
        assert_eq!(CellValue::Number(9.0).as_integer(), Some(9));
        assert_eq!(CellValue::Number(9.75).as_integer(), Some(9));
        assert_eq!(CellValue::from(" 15 ").as_integer(), Some(15));
        assert_eq!(CellValue::from("7.5").as_integer(), Some(7));
        assert_eq!(CellValue::from("noon").as_integer(), None);
        assert_eq!(CellValue::from("").as_integer(), None);
        assert_eq!(CellValue::Empty.as_integer(), None);
    }

    #[test]
    fn test_date_from_serial_number() {
        // 45658 is 2025-01-01 in spreadsheet serial days
        assert_eq!(
            CellValue::Number(45658.0).as_date(&formats()),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(CellValue::Number(0.0).as_date(&formats()), None);
    }

    #[test]
    fn test_date_from_text_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15);
        assert_eq!(CellValue::from("2026-03-15").as_date(&formats()), expected);
        assert_eq!(CellValue::from("3/15/2026").as_date(&formats()), expected);
        assert_eq!(
            CellValue::from("2026-03-15T00:00:00.000Z").as_date(&formats()),
            expected
        );
        assert_eq!(CellValue::from("next tuesday").as_date(&formats()), None);
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(CellValue::Number(25.0).to_text(), "25");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
        assert_eq!(CellValue::from("  Hall A ").to_text(), "Hall A");
        assert_eq!(CellValue::Empty.to_text(), "");
    }
}
