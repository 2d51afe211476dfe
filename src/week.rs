use crate::dates::{date_key, day_name, next_day, parse_day};
use crate::models::WeekItem;
use tracing::warn;

pub const WEEK_LEN: usize = 7;

/// Pads a partial server week to seven days.
///
/// Items are sorted by date; missing trailing days are synthesized after the
/// latest known date with no mood and the latest item's week number. An empty
/// input stays empty.
pub fn reconcile_week(items: Vec<WeekItem>) -> Vec<WeekItem> {
    let mut week = items;
    week.sort_by(|a, b| a.date.cmp(&b.date));

    let Some(last) = week.last() else {
        return week;
    };
    if week.len() >= WEEK_LEN {
        return week;
    }

    let Some(mut cursor) = parse_day(&last.date) else {
        warn!(date = %last.date, "cannot pad week from unparseable date");
        return week;
    };
    let week_number = last.week_number;

    while week.len() < WEEK_LEN {
        cursor = next_day(cursor);
        week.push(WeekItem {
            date: date_key(cursor),
            day_name: day_name(cursor),
            week_number,
            mood: None,
            created_at: None,
        });
    }

    week
}

/// Dates strictly before `today` with no recorded mood, ascending.
pub fn missing_days(week: &[WeekItem], today: &str) -> Vec<String> {
    let mut gaps: Vec<String> = week
        .iter()
        .filter(|item| item.mood.is_none() && item.date.as_str() < today)
        .map(|item| item.date.clone())
        .collect();
    gaps.sort();
    gaps.dedup();
    gaps
}

/// The most recent gap, which the backfill picker selects first.
pub fn default_backfill_date(gaps: &[String]) -> Option<&str> {
    gaps.last().map(String::as_str)
}
