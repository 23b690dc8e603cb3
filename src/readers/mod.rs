pub mod csv;
pub mod excel;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::types::{CellValue, Result};

pub use self::csv::CsvSource;
pub use self::excel::ExcelSource;
pub use self::memory::MemorySource;

static NULL_CELL: CellValue = CellValue::Null;

/// One data row, addressed by column name or header position
#[derive(Debug, Clone)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<CellValue>,
}

impl Record {
    pub fn new(headers: Arc<[String]>, values: Vec<CellValue>) -> Self {
        Self { headers, values }
    }

    /// Value for a column; absent columns read as null
    #[allow(dead_code)]
    pub fn get(&self, column: &str) -> &CellValue {
        self.headers
            .iter()
            .position(|h| h == column)
            .map_or(&NULL_CELL, |idx| self.get_index(idx))
    }

    /// Value at a header position; short rows read as null
    pub fn get_index(&self, idx: usize) -> &CellValue {
        self.values.get(idx).unwrap_or(&NULL_CELL)
    }

    #[allow(dead_code)]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// An ordered, single-pass sequence of records sharing one header
pub trait RowSource {
    /// Column names in file order
    fn headers(&self) -> &[String];

    /// Next record, `None` once the source is exhausted.
    ///
    /// An `Err` means the underlying transport failed and no further rows
    /// should be requested.
    fn next_row(&mut self) -> Option<Result<Record>>;
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" | "txt" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(FileFormat::Excel),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        FileFormat::from_extension(ext).ok_or_else(|| {
            crate::error::Error::UnsupportedFormat(format!(
                "Unsupported file extension: .{}",
                ext
            ))
        })
    }
}

/// How to open a file-backed row source
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Field delimiter; inferred from the extension when unset
    pub delimiter: Option<u8>,

    /// Worksheet to read from a workbook; the first sheet when unset
    pub sheet: Option<String>,
}

/// Open a row source for the given file path
pub fn open_source(path: &Path, options: &SourceOptions) -> Result<Box<dyn RowSource>> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => Ok(Box::new(CsvSource::open(
            path,
            options.delimiter.unwrap_or(b','),
        )?)),
        FileFormat::Tsv => Ok(Box::new(CsvSource::open(
            path,
            options.delimiter.unwrap_or(b'\t'),
        )?)),
        FileFormat::Excel => Ok(Box::new(ExcelSource::open(path, options.sheet.as_deref())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_missing_column_is_null() {
        let record = Record::new(headers(&["a", "b"]), vec![CellValue::from("1")]);
        assert_eq!(record.get("a"), &CellValue::from("1"));
        assert_eq!(record.get("b"), &CellValue::Null);
        assert_eq!(record.get("zzz"), &CellValue::Null);
        assert_eq!(record.get_index(7), &CellValue::Null);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_extension("CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("tab"), Some(FileFormat::Tsv));
        assert_eq!(FileFormat::from_extension("xlsx"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_extension("parquet"), None);
    }

    #[test]
    fn test_open_source_unsupported() {
        let result = open_source(Path::new("data.xyz"), &SourceOptions::default());
        assert!(result.is_err());
    }
}
