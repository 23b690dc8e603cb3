use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Rows between progress log lines
pub const DEFAULT_PROGRESS_EVERY: u64 = 1000;

/// Default location of the extracted name list
pub const DEFAULT_NAMES_FILE: &str = "_names.txt";

/// A single dataset value as delivered by a row source
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Number(f64),
    Temporal(NaiveDateTime),
    Null,
}

impl CellValue {
    /// Non-empty string content, if this is a string cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Absent, empty string, or numeric zero
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::String(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0,
            CellValue::Temporal(_) => false,
            CellValue::Null => true,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Temporal(dt)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Temporal(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => f.write_str(s),
            CellValue::Number(n) => {
                // Whole numbers print without a fractional part so that
                // digit-run detectors see "9434765919", not "9434765919.0"
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Temporal(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            CellValue::Null => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Temporal(_) => serializer.collect_str(self),
            CellValue::Null => serializer.serialize_none(),
        }
    }
}

/// Categories of identifiable information the scanner looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SystemNumber,
    Postcode,
    NationalId,
    DateOfBirth,
    Name,
}

impl Category {
    /// Categories that carry row-level evidence
    pub const EVIDENCE: [Category; 4] = [
        Category::SystemNumber,
        Category::Postcode,
        Category::NationalId,
        Category::DateOfBirth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::SystemNumber => "UHL System Number",
            Category::Postcode => "postcode",
            Category::NationalId => "NHS Number",
            Category::DateOfBirth => "Date of Birth",
            Category::Name => "name",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evidence of a detector match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Zero-based data row index (header excluded)
    pub row: u64,
    /// The cell value as read
    pub value: CellValue,
}

/// How much evidence the report surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    #[default]
    FirstMatch,
    AllMatches,
}

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Columns to scan; all header columns when unset
    pub columns: Option<Vec<String>>,

    /// Log progress every N rows (0 disables)
    pub progress_every: u64,

    /// Date the birth-date window is measured from; today (UTC) when unset
    pub reference_date: Option<NaiveDate>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            columns: None,
            progress_every: DEFAULT_PROGRESS_EVERY,
            reference_date: None,
        }
    }
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(9434765919.0).to_string(), "9434765919");
        assert_eq!(CellValue::Number(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Number(-42.0).to_string(), "-42");
    }

    #[test]
    fn test_temporal_display() {
        let d = NaiveDate::from_ymd_opt(1980, 1, 15).unwrap();
        assert_eq!(CellValue::from(d).to_string(), "1980-01-15T00:00:00");
    }

    #[test]
    fn test_as_text_skips_empty_and_non_strings() {
        assert_eq!(CellValue::from("abc").as_text(), Some("abc"));
        assert_eq!(CellValue::from("").as_text(), None);
        assert_eq!(CellValue::Number(1.0).as_text(), None);
        assert_eq!(CellValue::Null.as_text(), None);
    }

    #[test]
    fn test_blank_values() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::from("").is_blank());
        assert!(CellValue::Number(0.0).is_blank());
        assert!(!CellValue::from("0").is_blank());
    }

    #[test]
    fn test_cell_value_json() {
        let values = vec![
            CellValue::from("x"),
            CellValue::Number(2.5),
            CellValue::Null,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["x",2.5,null]"#);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::NationalId.label(), "NHS Number");
        assert_eq!(Category::DateOfBirth.to_string(), "Date of Birth");
    }
}
