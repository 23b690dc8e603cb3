use chrono::{Months, NaiveDate};

use crate::dates::parse_date;
use crate::types::CellValue;

/// Youngest plausible age, in years
pub const MIN_AGE_YEARS: u32 = 10;
/// Oldest plausible age, in years
pub const MAX_AGE_YEARS: u32 = 130;

/// Open interval of dates that imply an age between 10 and 130 years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDateWindow {
    reference: NaiveDate,
    earliest: NaiveDate,
    latest: NaiveDate,
}

impl BirthDateWindow {
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            reference,
            earliest: years_before(reference, MAX_AGE_YEARS),
            latest: years_before(reference, MIN_AGE_YEARS),
        }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Both ends are exclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest < date && date < self.latest
    }
}

// 29 February steps back to 28 February in non-leap years
fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// True if the value reads as a date inside the birth-date window
pub fn contains_birth_date(value: &CellValue, window: &BirthDateWindow) -> bool {
    parse_date(value, window.reference()).is_some_and(|date| window.contains(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_bounds_are_exclusive() {
        let window = BirthDateWindow::new(ymd(2026, 10, 17));
        assert!(!window.contains(ymd(2016, 10, 17)));
        assert!(window.contains(ymd(2016, 10, 16)));
        assert!(!window.contains(ymd(1896, 10, 17)));
        assert!(window.contains(ymd(1896, 10, 18)));
    }

    #[test]
    fn test_window_from_leap_day() {
        let window = BirthDateWindow::new(ymd(2024, 2, 29));
        assert!(!window.contains(ymd(2014, 2, 28)));
        assert!(window.contains(ymd(2014, 2, 27)));
    }

    #[test]
    fn test_just_over_ten_years() {
        let window = BirthDateWindow::new(ymd(2010, 1, 1));
        assert!(contains_birth_date(&CellValue::from("19991231"), &window));
    }

    #[test]
    fn test_one_day_short_of_ten_years() {
        let window = BirthDateWindow::new(ymd(2009, 12, 30));
        assert!(!contains_birth_date(&CellValue::from("19991231"), &window));
    }

    #[test]
    fn test_text_and_temporal_values() {
        let window = BirthDateWindow::new(ymd(2026, 10, 17));
        assert!(contains_birth_date(&CellValue::from("15/01/1980"), &window));
        assert!(contains_birth_date(&CellValue::from(ymd(1950, 6, 1)), &window));
        assert!(!contains_birth_date(&CellValue::from("2024-01-01"), &window));
        assert!(!contains_birth_date(&CellValue::from("1850-01-01"), &window));
    }

    #[test]
    fn test_unparseable_values() {
        let window = BirthDateWindow::new(ymd(2026, 10, 17));
        assert!(!contains_birth_date(&CellValue::from("not a date"), &window));
        assert!(!contains_birth_date(&CellValue::from("1980-13-45"), &window));
        assert!(!contains_birth_date(&CellValue::Number(5_000_000.0), &window));
        assert!(!contains_birth_date(&CellValue::Null, &window));
    }
}
