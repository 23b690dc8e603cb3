//! NHS number detection with modulus 11 check digit validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::CellValue;

// Ten digits, either contiguous or grouped 3-3-4 with a hyphen or space
static NHS_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[0-9]{10}|[0-9]{3}[- ][0-9]{3}[- ][0-9]{4})\b").unwrap()
});

/// Check digit for the first nine digits of an NHS number.
///
/// Weights run 10 down to 2. A remainder giving 11 maps to 0; one giving
/// 10 has no valid check digit and returns `None`.
pub fn check_digit(digits: &[u8; 9]) -> Option<u8> {
    let total: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| u32::from(*d) * (10 - i as u32))
        .sum();

    match 11 - total % 11 {
        11 => Some(0),
        10 => None,
        check => Some(check as u8),
    }
}

/// True if `candidate` holds exactly ten digits (separators ignored) and the
/// last one is the correct check digit
pub fn is_valid(candidate: &str) -> bool {
    let digits: Vec<u8> = candidate
        .bytes()
        .filter(|b| *b != b'-' && *b != b' ')
        .map(|b| b.wrapping_sub(b'0'))
        .collect();

    if digits.len() != 10 || digits.iter().any(|d| *d > 9) {
        return false;
    }

    let mut body = [0u8; 9];
    body.copy_from_slice(&digits[..9]);
    check_digit(&body) == Some(digits[9])
}

/// True if any NHS number candidate in the value passes the checksum
pub fn contains_nhs_number(value: &CellValue) -> bool {
    if value.is_blank() {
        return false;
    }

    let text = match value {
        CellValue::String(s) => std::borrow::Cow::Borrowed(s.as_str()),
        other => std::borrow::Cow::Owned(other.to_string()),
    };

    NHS_CANDIDATE
        .find_iter(&text)
        .any(|m| is_valid(m.as_str()))
}
