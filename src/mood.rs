use crate::dates::{date_key, now_millis};
use crate::errors::ClientError;
use crate::fetch::FetchKind;
use crate::home::fetch_week;
use crate::models::{Mood, MoodEntry, PastMoodRequest, SubmitMoodRequest, UserCache, WeekItem};
use crate::reminder;
use crate::session::Session;
use crate::state::AppState;
use crate::views::ViewState;
use crate::week::{default_backfill_date, missing_days};
use chrono::NaiveDate;
use tracing::info;

pub const NOTE_MAX: usize = 280;

/// Trims a note and cuts it to `NOTE_MAX` characters; blank notes are dropped.
pub fn clean_note(note: &str) -> Option<String> {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(NOTE_MAX).collect())
}

/// Today's mood picker.
#[derive(Default)]
pub struct MoodController {
    pub selected: Option<Mood>,
    pub state: ViewState<MoodEntry>,
}

impl MoodController {
    pub fn select(&mut self, mood: Mood) {
        self.selected = Some(mood);
    }

    pub async fn confirm(&mut self, app: &AppState, session: &Session, today: NaiveDate, note: &str) {
        let Some(mood) = self.selected else {
            self.state.fail(ClientError::validation("Pick a mood first."));
            return;
        };

        self.state.begin();
        let reason = clean_note(note);
        let body = SubmitMoodRequest {
            mood,
            reason: reason.clone(),
        };
        let result = app
            .api
            .submit_mood(&session.user_id, session.token(), &body)
            .await;

        let result = match result {
            Ok(()) => {
                let entry = MoodEntry {
                    user_id: session.user_id.clone(),
                    date: date_key(today),
                    mood,
                    reason,
                    saved_at: now_millis(),
                };
                app.store
                    .update_user(&session.user_id, |cache| {
                        cache.last_mood_entry = Some(entry.clone());
                    })
                    .await;
                info!(user_id = %session.user_id, mood = mood.value(), "mood saved");
                Ok(entry)
            }
            Err(err) => Err(err),
        };
        self.state.finish(result);
    }
}

/// Backfill picker for past days that have no mood yet.
#[derive(Default)]
pub struct PastMoodController {
    pub week: ViewState<Vec<WeekItem>>,
    pub missing: Vec<String>,
    pub selected_date: Option<String>,
    pub selected_mood: Option<Mood>,
    pub save: ViewState<MoodEntry>,
}

impl PastMoodController {
    pub async fn load(&mut self, app: &AppState, session: &Session, today: NaiveDate) {
        self.week.begin();
        let result = fetch_week(app, session, FetchKind::PastMood).await;
        if let Ok(week) = &result {
            self.missing = missing_days(week, &date_key(today));
            self.selected_date = default_backfill_date(&self.missing).map(str::to_string);
        }
        self.week.finish(result);
    }

    /// True once the week is known and every past day already has a mood.
    pub fn nothing_to_fill(&self) -> bool {
        self.week.ready().is_some() && self.missing.is_empty()
    }

    pub fn select_date(&mut self, date: &str) -> Result<(), ClientError> {
        if !self.missing.iter().any(|gap| gap == date) {
            return Err(ClientError::validation(format!(
                "{date} is not a day waiting for a mood."
            )));
        }
        self.selected_date = Some(date.to_string());
        Ok(())
    }

    pub fn select_mood(&mut self, mood: Mood) {
        self.selected_mood = Some(mood);
    }

    pub async fn confirm(&mut self, app: &AppState, session: &Session, today: NaiveDate, note: &str) {
        let (Some(date), Some(mood)) = (self.selected_date.clone(), self.selected_mood) else {
            self.save
                .fail(ClientError::validation("Pick a date and a mood first."));
            return;
        };

        self.save.begin();
        let reason = clean_note(note);
        let body = PastMoodRequest {
            date: date.clone(),
            mood,
            reason: reason.clone(),
        };
        let result = app
            .api
            .submit_past_mood(&session.user_id, session.token(), &body)
            .await;

        let result = match result {
            Ok(()) => {
                let entry = MoodEntry {
                    user_id: session.user_id.clone(),
                    date: date.clone(),
                    mood,
                    reason,
                    saved_at: now_millis(),
                };
                let today = date_key(today);
                app.store
                    .update_user(&session.user_id, |cache| {
                        record_past_entry(cache, &entry, &today)
                    })
                    .await;
                self.missing.retain(|gap| gap != &date);
                info!(user_id = %session.user_id, %date, mood = mood.value(), "past mood saved");
                Ok(entry)
            }
            Err(err) => Err(err),
        };
        self.save.finish(result);
    }
}

/// Stores a backfill result. The last mood entry is replaced unless it is
/// today's; the reminder for that date is settled.
pub fn record_past_entry(cache: &mut UserCache, entry: &MoodEntry, today: &str) {
    let keep_today = cache
        .last_mood_entry
        .as_ref()
        .is_some_and(|last| last.date == today);
    if !keep_today {
        cache.last_mood_entry = Some(entry.clone());
    }
    cache.last_past_mood_entry = Some(entry.clone());
    reminder::dismiss(cache, &entry.date);
}
