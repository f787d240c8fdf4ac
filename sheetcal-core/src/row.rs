//! Column-aligned sheet data and per-row views of it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// The thirteen columns the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Title,
    StartHour,
    StartMinute,
    EndHour,
    EndMinute,
    Location,
    Organizer,
    Description,
    Attendees,
    SetupType,
    Furniture,
    ResponsiblePerson,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Date,
        Field::Title,
        Field::StartHour,
        Field::StartMinute,
        Field::EndHour,
        Field::EndMinute,
        Field::Location,
        Field::Organizer,
        Field::Description,
        Field::Attendees,
        Field::SetupType,
        Field::Furniture,
        Field::ResponsiblePerson,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Title => "title",
            Field::StartHour => "start_hour",
            Field::StartMinute => "start_minute",
            Field::EndHour => "end_hour",
            Field::EndMinute => "end_minute",
            Field::Location => "location",
            Field::Organizer => "organizer",
            Field::Description => "description",
            Field::Attendees => "attendees",
            Field::SetupType => "setup_type",
            Field::Furniture => "furniture",
            Field::ResponsiblePerson => "responsible_person",
        }
    }
}

/// One sheet row: its 1-based row number and the cells of every field.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub row: u32,
    cells: HashMap<Field, CellValue>,
}

impl RawRow {
    pub fn new(row: u32) -> Self {
        Self {
            row,
            cells: HashMap::new(),
        }
    }

    pub fn with(mut self, field: Field, value: impl Into<CellValue>) -> Self {
        self.cells.insert(field, value.into());
        self
    }

    /// Cell for `field`; missing cells read as empty.
    pub fn get(&self, field: Field) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(&field).unwrap_or(&EMPTY)
    }
}

/// All columns of one read, aligned so index 0 is `start_row`.
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub start_row: u32,
    columns: HashMap<Field, Vec<CellValue>>,
}

impl SheetData {
    pub fn new(start_row: u32) -> Self {
        Self {
            start_row,
            columns: HashMap::new(),
        }
    }

    pub fn insert_column(&mut self, field: Field, values: Vec<CellValue>) {
        self.columns.insert(field, values);
    }

    /// Number of data rows, taken from the title column.
    ///
    /// Sources drop trailing empty cells, so the title column ends at the
    /// last titled row. Other columns may be shorter or longer.
    pub fn len(&self) -> usize {
        self.columns.get(&Field::Title).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sheet row number just past the data.
    pub fn end_row(&self) -> u32 {
        self.start_row + self.len() as u32
    }

    /// Build the row view for sheet row `row`.
    pub fn row(&self, row: u32) -> RawRow {
        let mut raw = RawRow::new(row);
        let Some(offset) = row.checked_sub(self.start_row) else {
            return raw;
        };
        for field in Field::ALL {
            if let Some(value) = self
                .columns
                .get(&field)
                .and_then(|col| col.get(offset as usize))
            {
                raw.cells.insert(field, value.clone());
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_align_across_ragged_columns() {
        let mut data = SheetData::new(2);
        data.insert_column(Field::Title, vec!["Gala".into(), "Fair".into(), "Expo".into()]);
        data.insert_column(Field::Location, vec!["Hall A".into()]);

        assert_eq!(data.len(), 3);
        assert_eq!(data.end_row(), 5);

        let row = data.row(3);
        assert_eq!(row.row, 3);
        assert_eq!(row.get(Field::Title), &CellValue::from("Fair"));
        assert_eq!(row.get(Field::Location), &CellValue::Empty);
        assert_eq!(data.row(2).get(Field::Location), &CellValue::from("Hall A"));
    }

    #[test]
    fn test_rows_before_start_are_empty() {
        let mut data = SheetData::new(2);
        data.insert_column(Field::Title, vec!["Gala".into()]);
        assert!(data.row(1).get(Field::Title).is_blank());
    }
}
