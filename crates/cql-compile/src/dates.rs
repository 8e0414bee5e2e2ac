//! Relative date resolution for chip values.
//!
//! Values like `-1d` or `+2w` are shorthand for "N days/weeks from today";
//! the backend only understands absolute ISO dates, so they are resolved at
//! compile time. Anything that does not match the shorthand shape passes
//! through untouched.

use chrono::{Duration, NaiveDate};

/// Resolves a relative date value against `today`, or returns the value
/// unchanged when it is not relative.
pub(crate) fn resolve_date_value(value: &str, today: NaiveDate) -> String {
    match parse_relative(value) {
        Some(days) => (today + Duration::days(days)).format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    }
}

/// Parses `±Nd` / `±Nw` into a signed day count.
fn parse_relative(value: &str) -> Option<i64> {
    let rest = value.strip_prefix('-').or_else(|| value.strip_prefix('+'))?;
    let negative = value.starts_with('-');

    let (digits, unit) = rest.split_at(rest.len().checked_sub(1)?);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let count: i64 = digits.parse().ok()?;

    let days = match unit {
        "d" => count,
        "w" => count * 7,
        _ => return None,
    };
    Some(if negative { -days } else { days })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn days_ago() {
        assert_eq!(resolve_date_value("-1d", today()), "2024-01-14");
        assert_eq!(resolve_date_value("-30d", today()), "2023-12-16");
    }

    #[test]
    fn days_ahead() {
        assert_eq!(resolve_date_value("+7d", today()), "2024-01-22");
    }

    #[test]
    fn weeks() {
        assert_eq!(resolve_date_value("-1w", today()), "2024-01-08");
        assert_eq!(resolve_date_value("+2w", today()), "2024-01-29");
    }

    #[test]
    fn absolute_dates_pass_through() {
        assert_eq!(resolve_date_value("2023-06-01", today()), "2023-06-01");
    }

    #[test]
    fn non_dates_pass_through() {
        assert_eq!(resolve_date_value("commentisfree", today()), "commentisfree");
        assert_eq!(resolve_date_value("-d", today()), "-d");
        assert_eq!(resolve_date_value("-1x", today()), "-1x");
        assert_eq!(resolve_date_value("1d", today()), "1d");
        assert_eq!(resolve_date_value("-", today()), "-");
    }
}
