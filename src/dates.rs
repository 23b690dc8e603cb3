//! Calendar date recovery from loosely formatted cell values.
//!
//! Values are tried in a fixed order: native temporal cells, compact ANSI
//! dates (`19800115`, `1980-01-15 10:30:00`), a guard against large plain
//! numbers, and finally a day-first parser for human-written dates.

use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::CellValue;

/// Plain numbers strictly inside this range are never read as text dates
pub const NUMERIC_GUARD_MIN: f64 = 1_000_000.0;
pub const NUMERIC_GUARD_MAX: f64 = 100_000_000.0;

// Whole-value ANSI form: year, month, day with optional separators, time,
// fractional seconds and UTC offset
static ANSI_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>[0-9]{4})[\\ -]?(?P<month>[0-9]{2})[\\ -]?(?P<day>[0-9]{2})(?:[ T][0-9]{2}:[0-9]{2}:[0-9]{2})?(?:\.[0-9]+)?(?:[+-][0-9]{2}:[0-9]{2})?$",
    )
    .unwrap()
});

static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b[0-9]{1,2}:[0-9]{2}(?::[0-9]{2}(?:[.,][0-9]+)?)?(?:\s*[ap]\.?m\.?)?(?:\s*(?:z|utc|gmt|[+-][0-9]{2}:?[0-9]{2})\b)?",
    )
    .unwrap()
});

// ISO 8601 joins date and time with a `T`
static DATE_TIME_JOIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9])[Tt]([0-9])").unwrap());

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,./\\-]+").unwrap());

static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{1,2})(?:st|nd|rd|th)$").unwrap());

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("sept", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const WEEKDAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "mon", "tue",
    "tues", "wed", "thu", "thur", "thurs", "fri", "sat", "sun",
];

const FILLER_WORDS: &[&str] = &["of", "on", "at", "the"];

/// Interpret a cell as a calendar date.
///
/// `reference` supplies the century for two-digit years and the day of
/// month when only a month and year are written.
pub fn parse_date(value: &CellValue, reference: NaiveDate) -> Option<NaiveDate> {
    if value.is_blank() {
        return None;
    }

    match value {
        CellValue::Temporal(dt) => Some(dt.date()),
        CellValue::String(s) => parse_text(s, reference),
        CellValue::Number(_) => parse_text(&value.to_string(), reference),
        CellValue::Null => None,
    }
}

fn parse_text(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ANSI_DATE.captures(text) {
        let year = caps["year"].parse::<i32>().ok()?;
        let month = caps["month"].parse::<u32>().ok()?;
        let day = caps["day"].parse::<u32>().ok()?;
        // An ANSI-shaped value with impossible components is not retried
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Ok(number) = text.trim().parse::<f64>() {
        if NUMERIC_GUARD_MIN < number && number < NUMERIC_GUARD_MAX {
            return None;
        }
    }

    parse_day_first(text, reference)
}

#[derive(Debug, Clone, Copy)]
struct Number {
    value: u32,
    digits: usize,
}

impl Number {
    fn is_yearish(self) -> bool {
        self.digits >= 3 || self.value > 31
    }
}

/// Day-first parser for human-written dates such as `15/01/1980`,
/// `1st March 1975` or `Tue, 15 Jan 80 10:30`.
pub fn parse_day_first(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    // A plain number is a quantity, not a date
    if text.trim().parse::<f64>().is_ok() {
        return None;
    }

    let unjoined = DATE_TIME_JOIN.replace_all(text, "${1} ${2}");
    let without_time = TIME_OF_DAY.replace_all(&unjoined, " ");

    let mut numbers: Vec<Number> = Vec::new();
    let mut month_name: Option<u32> = None;

    for part in SEPARATORS.split(without_time.trim()) {
        if part.is_empty() {
            continue;
        }
        let lower = part.to_lowercase();

        if lower.bytes().all(|b| b.is_ascii_digit()) {
            numbers.push(to_number(&lower)?);
        } else if let Some(caps) = ORDINAL.captures(&lower) {
            numbers.push(to_number(&caps[1])?);
        } else if lower.chars().all(|c| c.is_ascii_alphabetic()) {
            if let Some(month) = month_from_word(&lower) {
                if month_name.replace(month).is_some() {
                    return None;
                }
            } else if !WEEKDAYS.contains(&lower.as_str()) && !FILLER_WORDS.contains(&lower.as_str())
            {
                return None;
            }
        } else {
            return None;
        }
    }

    match month_name {
        Some(month) => resolve_with_month_name(&numbers, month, reference),
        None => resolve_numeric(&numbers, reference),
    }
}

fn to_number(digits: &str) -> Option<Number> {
    if digits.len() > 4 {
        return None;
    }
    Some(Number {
        value: digits.parse().ok()?,
        digits: digits.len(),
    })
}

fn month_from_word(word: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == word || (word.len() == 3 && name.starts_with(word)))
        .map(|(_, month)| *month)
}

fn resolve_with_month_name(numbers: &[Number], month: u32, reference: NaiveDate) -> Option<NaiveDate> {
    match numbers {
        [a, b] => {
            let (day, year) = if a.is_yearish() && !b.is_yearish() {
                (b, a)
            } else {
                (a, b)
            };
            NaiveDate::from_ymd_opt(resolve_year(*year, reference), month, day.value)
        }
        [n] if n.is_yearish() => month_of_year(*n, month, reference),
        [n] => NaiveDate::from_ymd_opt(reference.year(), month, n.value),
        _ => None,
    }
}

fn resolve_numeric(numbers: &[Number], reference: NaiveDate) -> Option<NaiveDate> {
    let (a, b, c) = match numbers {
        [a, b, c] => (a, b, c),
        // Month and year only, in either order
        [a, b] => {
            return match (a.is_yearish(), b.is_yearish()) {
                (true, false) => month_of_year(*a, b.value, reference),
                (false, true) => month_of_year(*b, a.value, reference),
                _ => None,
            };
        }
        _ => return None,
    };

    let (year, mut month, mut day) = if a.is_yearish() {
        (*a, b.value, c.value)
    } else {
        (*c, b.value, a.value)
    };

    // Day-first is only a preference: 12/25/1980 can only be month-first
    if month > 12 && day <= 12 {
        std::mem::swap(&mut month, &mut day);
    }

    NaiveDate::from_ymd_opt(resolve_year(year, reference), month, day)
}

/// A date in `month` of `year`, on the reference day clamped to the month's length
fn month_of_year(year: Number, month: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let year = resolve_year(year, reference);
    let day = reference.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years land within fifty years of the reference year
fn resolve_year(year: Number, reference: NaiveDate) -> i32 {
    let value = year.value as i32;
    if year.digits > 2 {
        return value;
    }

    let current = reference.year();
    let mut resolved = current / 100 * 100 + value;
    if resolved >= current + 50 {
        resolved -= 100;
    } else if resolved < current - 50 {
        resolved += 100;
    }
    resolved
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}
