use chrono::{Datelike, Duration, Local, NaiveDate, Utc};

use crate::models::DayName;

/// Weekday names indexed by days from Sunday.
pub const DAY_NAMES: [DayName; 7] = [
    DayName::Sunday,
    DayName::Monday,
    DayName::Tuesday,
    DayName::Wednesday,
    DayName::Thursday,
    DayName::Friday,
    DayName::Saturday,
];

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a `YYYY-MM-DD` day string. Anything after the day part (a time
/// component from the backend) is ignored.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let day_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date + Duration::days(1)
}

pub fn day_name(date: NaiveDate) -> DayName {
    DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Day of month for calendar cells, 0 when the string is not a date.
pub fn day_of_month(value: &str) -> u32 {
    parse_day(value).map(|date| date.day()).unwrap_or(0)
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_plain_and_timestamped_values() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        assert_eq!(parse_day("2025-11-20"), Some(expected));
        assert_eq!(parse_day("2025-11-20T08:15:00+07:00"), Some(expected));
        assert_eq!(parse_day("20-11-2025"), None);
        assert_eq!(parse_day("2025"), None);
    }

    #[test]
    fn next_day_rolls_over_year_boundary() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(date_key(next_day(date)), "2026-01-01");
    }

    #[test]
    fn day_name_uses_sunday_first_table() {
        let sunday = NaiveDate::from_ymd_opt(2025, 11, 23).unwrap();
        assert_eq!(day_name(sunday), DayName::Sunday);
        assert_eq!(day_name(sunday - Duration::days(3)), DayName::Thursday);
    }

    #[test]
    fn day_of_month_falls_back_to_zero() {
        assert_eq!(day_of_month("2025-11-07"), 7);
        assert_eq!(day_of_month("not a date"), 0);
    }
}
