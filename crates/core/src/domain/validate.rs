use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fractional digits every entered amount must carry.
pub const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatError {
    pub input: String,
}

impl fmt::Display for DateFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid date format: '{}'. Use YYYY-MM-DD format.",
            self.input
        )
    }
}

impl std::error::Error for DateFormatError {}

/// Parses `text` as a calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono alone accepts unpadded fields ("2024-1-5"), so the shape is checked
/// before parsing.
pub fn validate_date(text: &str) -> Result<NaiveDate, DateFormatError> {
    let err = || DateFormatError {
        input: text.to_string(),
    };

    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(err());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| err())
}

/// Parses an amount, keeping the scale exactly as written.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    if t.contains(['e', 'E']) {
        return Decimal::from_scientific(t).ok();
    }
    Decimal::from_str_exact(t).ok()
}

/// True when `text` is a decimal number written with exactly two digits after
/// the point. "10" and "10.0" are rejected; nothing is rounded.
pub fn is_valid_amount(text: &str) -> bool {
    parse_amount(text).is_some_and(|d| d.scale() == AMOUNT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_fraction_digits() {
        assert!(is_valid_amount("10.00"));
        assert!(is_valid_amount("0.00"));
        assert!(is_valid_amount("1234.56"));
        assert!(is_valid_amount(" 10.00 "));
    }

    #[test]
    fn rejects_other_fraction_digit_counts() {
        assert!(!is_valid_amount("10"));
        assert!(!is_valid_amount("10.0"));
        assert!(!is_valid_amount("10.000"));
        assert!(!is_valid_amount("10.001"));
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(!is_valid_amount("abc"));
        assert!(!is_valid_amount(""));
        assert!(!is_valid_amount("10,00"));
        assert!(!is_valid_amount("END"));
    }

    #[test]
    fn rejects_amounts_beyond_decimal_range() {
        assert!(!is_valid_amount("99999999999999999999999999999.00"));
        assert!(is_valid_amount("9999999999999999999999999.00"));
    }

    #[test]
    fn parse_amount_keeps_written_scale() {
        let d = parse_amount("10.00").unwrap();
        assert_eq!(d.scale(), 2);
        assert_eq!(d.to_string(), "10.00");
    }

    #[test]
    fn validates_real_calendar_dates() {
        assert_eq!(
            validate_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("2023-02-29").is_err());
    }

    #[test]
    fn rejects_dates_not_in_iso_shape() {
        assert!(validate_date("2024-1-01").is_err());
        assert!(validate_date("01-01-2024").is_err());
        assert!(validate_date("2024/01/01").is_err());
        assert!(validate_date("2024-01-01T00:00").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn date_error_names_the_input() {
        let err = validate_date("tomorrow").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid date format: 'tomorrow'. Use YYYY-MM-DD format."
        );
    }
}
