use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::Error;
use crate::types::{CellValue, Result};

use super::{Record, RowSource};

/// Workbook row source (supports .xlsx, .xls, .xlsm, .xlsb, .ods).
///
/// The first row of the sheet is the header. Native numbers and dates keep
/// their type instead of being flattened to text.
pub struct ExcelSource {
    range: Range<Data>,
    headers: Arc<[String]>,
    next_row: usize,
    row_count: usize,
}

impl ExcelSource {
    /// Open `sheet`, or the first sheet in the workbook
    pub fn open(path: &Path, sheet: Option<&str>) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => workbook.sheet_names().first().cloned().ok_or_else(|| {
                Error::InvalidInput(format!("{} has no worksheets", path.display()))
            })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(Error::Excel)?;
        debug!(path = %path.display(), sheet = %sheet_name, "opened worksheet");

        Ok(Self::from_range(range))
    }

    /// Wrap an already loaded sheet range
    pub fn from_range(range: Range<Data>) -> Self {
        let (row_count, col_count) = range.get_size();

        let headers: Arc<[String]> = (0..col_count)
            .map(|col| {
                let name = range
                    .get((0, col))
                    .map(Self::data_to_string)
                    .unwrap_or_default();
                if name.is_empty() {
                    format!("Column{}", col + 1)
                } else {
                    name
                }
            })
            .collect();

        Self {
            range,
            headers,
            next_row: 1,
            row_count,
        }
    }

    /// Convert Excel Data to string representation
    fn data_to_string(dt: &Data) -> String {
        match dt {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => CellValue::Number(*f).to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(_) => Self::data_to_cell(dt).to_string(),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
            Data::Error(e) => format!("#{:?}", e),
        }
    }

    /// Map a workbook cell onto the scanner's value model
    fn data_to_cell(dt: &Data) -> CellValue {
        match dt {
            Data::Empty | Data::Error(_) => CellValue::Null,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::String(b.to_string()),
            Data::DateTime(d) => excel_serial_to_datetime(d.as_f64())
                .map(CellValue::Temporal)
                .unwrap_or(CellValue::Number(d.as_f64())),
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::Temporal)
                .unwrap_or_else(|| CellValue::String(s.clone())),
            Data::DurationIso(s) => CellValue::String(s.clone()),
        }
    }
}

impl RowSource for ExcelSource {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn next_row(&mut self) -> Option<Result<Record>> {
        if self.next_row >= self.row_count {
            return None;
        }

        let row = self.next_row;
        self.next_row += 1;

        let values = (0..self.headers.len())
            .map(|col| {
                self.range
                    .get((row, col))
                    .map(Self::data_to_cell)
                    .unwrap_or(CellValue::Null)
            })
            .collect();

        Some(Ok(Record::new(Arc::clone(&self.headers), values)))
    }
}

/// Convert an Excel serial date (days since 1899-12-30) to a timestamp
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let millis = (serial * 86_400_000.0).round();
    if !millis.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    base.checked_add_signed(chrono::Duration::milliseconds(millis as i64))
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| s.parse::<NaiveDate>().ok().map(|d| d.and_time(chrono::NaiveTime::MIN)))
}
