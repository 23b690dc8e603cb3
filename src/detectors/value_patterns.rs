use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::CellValue;

// Hospital system numbers: S/R/F/G + 7 digits, U + 7 digits with any suffix,
// LB + 7 digits, or the RTD prefix followed by digits and hyphens
static SYSTEM_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[SRFG]\d{7}|U\d{7}.*|LB\d{7}|RTD[\-0-9]*").unwrap()
});

// UK postcodes, including the GIR 0AA special case
static POSTCODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[Gg][Ii][Rr] ?0[Aa]{2})|(?:(?:(?:[A-Za-z][0-9]{1,2})|(?:(?:[A-Za-z][A-Ha-hJ-Yj-y][0-9]{1,2})|(?:(?:[A-Za-z][0-9][A-Za-z])|(?:[A-Za-z][A-Ha-hJ-Yj-y][0-9][A-Za-z]?))))\s?[0-9][A-Za-z]{2})",
    )
    .unwrap()
});

/// True if a string cell contains a hospital system number anywhere
pub fn contains_system_number(value: &CellValue) -> bool {
    value
        .as_text()
        .is_some_and(|text| SYSTEM_NUMBER_PATTERN.is_match(text))
}

/// True if a string cell contains a UK postcode anywhere
pub fn contains_postcode(value: &CellValue) -> bool {
    value
        .as_text()
        .is_some_and(|text| POSTCODE_PATTERN.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_system_number_formats() {
        assert!(contains_system_number(&text("S1234567")));
        assert!(contains_system_number(&text("R7654321")));
        assert!(contains_system_number(&text("U1234567/A")));
        assert!(contains_system_number(&text("LB1234567")));
        assert!(contains_system_number(&text("RTD-0012-34")));
    }

    #[test]
    fn test_system_number_inside_text() {
        assert!(contains_system_number(&text("ref G1234567 seen")));
    }

    #[test]
    fn test_system_number_rejects() {
        assert!(!contains_system_number(&text("X1234567")));
        assert!(!contains_system_number(&text("S123456")));
        assert!(!contains_system_number(&text("s1234567")));
        assert!(!contains_system_number(&text("")));
    }

    #[test]
    fn test_system_number_non_string() {
        assert!(!contains_system_number(&CellValue::Number(1234567.0)));
        assert!(!contains_system_number(&CellValue::Null));
    }

    #[test]
    fn test_postcode_formats() {
        assert!(contains_postcode(&text("LE1 5WW")));
        assert!(contains_postcode(&text("le15ww")));
        assert!(contains_postcode(&text("SW1A 1AA")));
        assert!(contains_postcode(&text("M1 1AE")));
        assert!(contains_postcode(&text("B33 8TH")));
        assert!(contains_postcode(&text("GIR 0AA")));
    }

    #[test]
    fn test_postcode_inside_text() {
        assert!(contains_postcode(&text("Flat 2, 10 High St, Leicester LE1 5WW")));
    }

    #[test]
    fn test_postcode_rejects() {
        assert!(!contains_postcode(&text("hello world")));
        assert!(!contains_postcode(&text("12345")));
        assert!(!contains_postcode(&CellValue::Null));
    }
}
