use crate::dates::date_key;
use crate::errors::ClientError;
use crate::fetch::FetchKind;
use crate::models::{MoodEntry, WeekItem};
use crate::reminder;
use crate::session::Session;
use crate::state::AppState;
use crate::views::ViewState;
use crate::week::{missing_days, reconcile_week};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Fetches the user's week and pads it to seven days. Superseded by the next
/// week fetch made for the same `kind` of view.
pub async fn fetch_week(
    app: &AppState,
    session: &Session,
    kind: FetchKind,
) -> Result<Vec<WeekItem>, ClientError> {
    let api = app.api.clone();
    let user_id = session.user_id.clone();
    let token = session.token.clone();
    let slot = app.fetches.slot(kind).await;

    slot.run(async move {
        let items = api.week(&user_id, token.as_deref()).await?;
        Ok(reconcile_week(items))
    })
    .await
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub today: String,
    pub week: Vec<WeekItem>,
    pub week_error: Option<String>,
    pub missing: Vec<String>,
    pub reminder: Option<String>,
    pub last_entry: Option<MoodEntry>,
}

impl HomeView {
    pub fn logged_today(&self) -> bool {
        self.week
            .iter()
            .any(|item| item.date == self.today && item.mood.is_some())
    }
}

/// Weekly calendar plus the one-time missed-day reminder.
#[derive(Default)]
pub struct HomeController {
    pub state: ViewState<HomeView>,
}

impl HomeController {
    pub async fn load(&mut self, app: &AppState, session: &Session, today: NaiveDate, now_ms: i64) {
        self.state.begin();
        let today = date_key(today);

        let (week, week_error, gaps) = match fetch_week(app, session, FetchKind::Home).await {
            Ok(week) => {
                let gaps = missing_days(&week, &today);
                (week, None, gaps)
            }
            Err(ClientError::Cancelled) => return,
            Err(err) => {
                warn!(user_id = %session.user_id, "week unavailable: {err}");
                let gaps = history_gaps(app, session, &today).await;
                (Vec::new(), Some(err.to_string()), gaps)
            }
        };

        let reminder = app
            .store
            .update_user(&session.user_id, |cache| reminder::evaluate(cache, &gaps, now_ms))
            .await;
        if let Some(date) = &reminder {
            debug!(user_id = %session.user_id, %date, "showing missed-day reminder");
        }
        let last_entry = app.store.user_cache(&session.user_id).await.last_mood_entry;

        self.state.finish(Ok(HomeView {
            today,
            week,
            week_error,
            missing: gaps,
            reminder,
            last_entry,
        }));
    }
}

/// Gap lookup used only when the week itself could not be loaded.
async fn history_gaps(app: &AppState, session: &Session, today: &str) -> Vec<String> {
    match app.api.history(&session.user_id, session.token()).await {
        Ok(history) => missing_days(&history, today),
        Err(err) => {
            debug!(user_id = %session.user_id, "history fallback failed: {err}");
            Vec::new()
        }
    }
}
