// Utility helpers for parsing and number formatting.
//
// This module centralizes the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use num_format::{Locale, ToFormattedString};
use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a string-like value into a `Decimal` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_decimal_safe(s: Option<&str>) -> Option<Decimal> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<Decimal>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "").parse::<u64>().ok()
}

/// Submission timestamps arrive as `YYYY-MM-DD HH:MM:SS` or a bare date.
pub fn parse_datetime_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Non-empty trimmed text, or `None`.
pub fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Today's date in the reporting timezone (Asia/Bangkok is +7).
pub fn today_at_offset(offset_hours: i32) -> NaiveDate {
    let now: DateTime<Utc> = Utc::now();
    match FixedOffset::east_opt(offset_hours * 3600) {
        Some(tz) => now.with_timezone(&tz).date_naive(),
        None => now.date_naive(),
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(n: Decimal) -> Decimal {
    n.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_number(n: Decimal, decimals: u32) -> String {
    // Fixed decimal places with locale-aware thousands separators
    // (e.g., `1,234,567.89`).
    let n = n.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let neg = n.is_sign_negative() && !n.is_zero();
    let s = format!("{:.*}", decimals as usize, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_separators() {
        assert_eq!(
            parse_decimal_safe(Some(" 4,000,000.50 ")),
            Some(Decimal::new(400_000_050, 2))
        );
        assert_eq!(parse_decimal_safe(Some("0.1")), Some(Decimal::new(1, 1)));
        assert_eq!(parse_decimal_safe(Some("12abc")), None);
        assert_eq!(parse_decimal_safe(Some("")), None);
        assert_eq!(parse_u64_safe(Some("1,200")), Some(1200));
        assert_eq!(parse_u64_safe(Some("-1")), None);
    }

    #[test]
    fn parses_submission_timestamps() {
        let dt = parse_datetime_safe(Some("2025-01-15 10:30:00")).unwrap();
        assert_eq!(dt.format("%m").to_string(), "01");
        assert!(parse_datetime_safe(Some("2025-02-01")).is_some());
        assert!(parse_datetime_safe(Some("yesterday")).is_none());
    }

    #[test]
    fn rounds_and_formats() {
        assert_eq!(round2(Decimal::new(20_000_004, 3)), Decimal::from(20_000));
        assert_eq!(round2(Decimal::new(2_345_678, 6)), Decimal::new(235, 2));
        assert_eq!(round2(Decimal::new(2_345, 3)), Decimal::new(235, 2));
        assert_eq!(format_number(Decimal::from(6_000_000), 2), "6,000,000.00");
        assert_eq!(format_number(Decimal::new(-12_345, 1), 1), "-1,234.5");
        assert_eq!(format_number(Decimal::new(27_272_727, 3), 2), "27,272.73");
        assert_eq!(format_number(Decimal::ZERO, 0), "0");
        assert_eq!(format_int(9855u64), "9,855");
    }
}
