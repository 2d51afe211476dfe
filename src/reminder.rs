use crate::models::UserCache;
use crate::week::default_backfill_date;

/// How long the login marker stays valid.
pub const LOGIN_MARKER_TTL_MS: i64 = 10 * 60 * 1000;

pub fn mark_logged_in(cache: &mut UserCache, now_ms: i64) {
    cache.just_logged_in_at = Some(now_ms);
}

/// Consumes the login marker. True only for a marker younger than the TTL.
pub fn take_login_marker(cache: &mut UserCache, now_ms: i64) -> bool {
    match cache.just_logged_in_at.take() {
        Some(at) => now_ms.saturating_sub(at) <= LOGIN_MARKER_TTL_MS,
        None => false,
    }
}

pub fn is_dismissed(cache: &UserCache, date: &str) -> bool {
    cache.dismissed_reminders.contains(date)
}

/// Records that the prompt for `date` was shown, closed or fulfilled.
pub fn dismiss(cache: &mut UserCache, date: &str) {
    cache.dismissed_reminders.insert(date.to_string());
}

/// Decides whether the missed-day prompt shows after a login, returning the
/// date it should ask about. The marker is consumed either way, and a date is
/// asked about at most once per user even if the prompt is left unanswered.
pub fn evaluate(cache: &mut UserCache, gaps: &[String], now_ms: i64) -> Option<String> {
    if !take_login_marker(cache, now_ms) {
        return None;
    }
    let date = default_backfill_date(gaps)?;
    if is_dismissed(cache, date) {
        return None;
    }
    dismiss(cache, date);
    Some(date.to_string())
}
