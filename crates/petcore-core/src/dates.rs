//! Wire date conversion and human-readable date/age text.
//!
//! The backend exchanges dates as `yyyy-MM-dd'T'HH:mm:ss.SSSZ` strings in UTC.
//! Reads are lenient: RFC 3339 (with or without fractional seconds) first, then
//! the fixed submission pattern, then a bare `yyyy-MM-dd`. Display helpers never
//! fail; they fall back to the raw input or to `None`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

/// Pattern used when submitting dates.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
const DAY_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%b %-d, %Y";
pub const UNKNOWN_AGE: &str = "Unknown";

pub fn date_to_string(date: DateTime<Utc>) -> String {
    date.format(WIRE_FORMAT).to_string()
}

pub fn string_to_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(trimmed, WIRE_FORMAT) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, DAY_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Submission string for a calendar day, pinned to midnight UTC.
pub fn naive_to_wire(date: NaiveDate) -> String {
    date_to_string(date.and_time(NaiveTime::MIN).and_utc())
}

pub fn wire_to_naive(value: &str) -> Option<NaiveDate> {
    string_to_date(value).map(|date| date.date_naive())
}

/// `Aug 2, 2022`, or `value` untouched when it does not parse.
pub fn format_date(value: &str) -> String {
    match string_to_date(value) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => value.to_string(),
    }
}

/// Describes the age of something born on `value` as seen on `today`.
///
/// Whole years win over months. Returns `None` when `value` does not parse.
pub fn calculate_age(value: &str, today: NaiveDate) -> Option<String> {
    let born = wire_to_naive(value)?;
    let months = whole_months_between(born, today).max(0);
    let years = months / 12;

    let text = match (years, months) {
        (1, _) => "1 year old".to_string(),
        (y, _) if y > 1 => format!("{y} years old"),
        (_, 1) => "1 month old".to_string(),
        (_, m) if m > 1 => format!("{m} months old"),
        _ => "Less than 1 month old".to_string(),
    };
    Some(text)
}

/// Same as [`calculate_age`] with `"Unknown"` for unparseable input.
pub fn age_label(value: &str, today: NaiveDate) -> String {
    calculate_age(value, today).unwrap_or_else(|| UNKNOWN_AGE.to_string())
}

fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months = (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if to.day() < from.day() && !is_last_day_of_month(to) {
        months -= 1;
    }
    months
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt()
        .map(|next| next.month() != date.month())
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn writes_fixed_pattern_in_utc() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(date_to_string(date), "2024-03-09T14:05:07.000+0000");
    }

    #[test]
    fn reads_all_supported_shapes() {
        let expected = Utc.with_ymd_and_hms(2022, 8, 2, 0, 0, 0).unwrap();
        assert_eq!(string_to_date("2022-08-02T00:00:00.000Z"), Some(expected));
        assert_eq!(string_to_date("2022-08-02T00:00:00Z"), Some(expected));
        assert_eq!(string_to_date("2022-08-02T00:00:00.000+0000"), Some(expected));
        assert_eq!(string_to_date("2022-08-02"), Some(expected));
        assert_eq!(string_to_date("02/08/2022"), None);
        assert_eq!(string_to_date("   "), None);
    }

    #[test]
    fn round_trip_keeps_millisecond_precision() {
        let date = Utc
            .with_ymd_and_hms(2023, 11, 30, 23, 59, 58)
            .unwrap()
            .with_nanosecond(123_000_000)
            .unwrap();
        let parsed = string_to_date(&date_to_string(date)).unwrap();
        assert_eq!(parsed, date);
    }

    #[test]
    fn format_date_falls_back_to_input() {
        assert_eq!(format_date("2022-08-02T00:00:00.000Z"), "Aug 2, 2022");
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn age_prefers_years_then_months() {
        let born = "2022-08-02T00:00:00.000Z";
        assert_eq!(calculate_age(born, day(2024, 8, 2)).as_deref(), Some("2 years old"));
        assert_eq!(calculate_age(born, day(2024, 7, 15)).as_deref(), Some("1 year old"));
        assert_eq!(calculate_age(born, day(2023, 8, 1)).as_deref(), Some("11 months old"));
        assert_eq!(calculate_age(born, day(2022, 9, 2)).as_deref(), Some("1 month old"));
        assert_eq!(
            calculate_age(born, day(2022, 8, 20)).as_deref(),
            Some("Less than 1 month old")
        );
    }

    #[test]
    fn age_counts_month_end_as_whole_month() {
        assert_eq!(
            calculate_age("2024-01-31", day(2024, 2, 29)).as_deref(),
            Some("1 month old")
        );
    }

    #[test]
    fn unparseable_age_is_none_or_unknown() {
        assert_eq!(calculate_age("yesterday", day(2024, 1, 1)), None);
        assert_eq!(age_label("yesterday", day(2024, 1, 1)), "Unknown");
    }
}
