//! Calendar date validation for user-supplied `YYYY-MM-DD` strings.

use crate::domain::ValidationError;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a date string.
///
/// - Blank (after trimming) → `Ok(None)`; the caller decides if that is acceptable.
/// - Exactly `YYYY-MM-DD`, zero-padded, naming a real calendar day → `Ok(Some(date))`.
/// - Anything else (wrong shape, month 13, Feb 30, ...) → `InvalidDateFormat`.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let invalid = || ValidationError::InvalidDateFormat {
        input: text.to_string(),
    };

    // chrono accepts unpadded fields; the prompt contract does not.
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid())
}
