use crate::errors::ClientError;
use crate::fetch::FetchKind;
use crate::models::WeeklyStats;
use crate::session::Session;
use crate::state::AppState;
use crate::views::ViewState;
use std::time::Duration;
use tracing::debug;

/// How long a stats page waits for fresh numbers before rendering the stored
/// copy marked as refreshing.
pub const REFRESH_WAIT: Duration = Duration::from_millis(1500);

/// Weekly statistics with a selectable week.
#[derive(Default)]
pub struct StatsController {
    pub current_week: Option<u32>,
    pub selected_week: Option<u32>,
    /// Last stored response for the selected week, shown while loading.
    pub placeholder: Option<WeeklyStats>,
    pub state: ViewState<WeeklyStats>,
}

impl StatsController {
    /// Loads `requested` (or the server's current week) and refreshes the
    /// stored copy of that week.
    pub async fn load(&mut self, app: &AppState, session: &Session, requested: Option<u32>) {
        self.load_within(app, session, requested, REFRESH_WAIT).await;
    }

    /// Gives up waiting for the fresh response after `wait` and leaves the
    /// view loading on top of the stored copy.
    async fn load_within(
        &mut self,
        app: &AppState,
        session: &Session,
        requested: Option<u32>,
        wait: Duration,
    ) {
        self.state.begin();

        let current = match self.current_week {
            Some(week) => week,
            None => match app
                .api
                .current_week_number(&session.user_id, session.token())
                .await
            {
                Ok(week) => {
                    self.current_week = Some(week);
                    week
                }
                Err(err) => {
                    self.state.fail(err);
                    return;
                }
            },
        };

        let week = requested.unwrap_or(current);
        if week == 0 || week > current {
            self.state
                .fail(ClientError::validation(format!("Week {week} is not available yet.")));
            return;
        }
        self.select_week(app, session, week).await;

        let api = app.api.clone();
        let store = app.store.clone();
        let user_id = session.user_id.clone();
        let token = session.token.clone();
        let slot = app.fetches.slot(FetchKind::Stats).await;
        // The stored copy is refreshed from inside the request so a response
        // that outlives `wait` still lands for the next visit.
        let request = slot.run(async move {
            let stats = api.weekly_stats(&user_id, token.as_deref(), Some(week)).await?;
            let stored = stats.clone();
            store
                .update_user(&user_id, |cache| {
                    cache.weekly_stats.insert(week, stored);
                })
                .await;
            Ok(stats)
        });

        match tokio::time::timeout(wait, request).await {
            Ok(result) => self.state.finish(result),
            Err(_) => debug!(week, "stats still refreshing; showing stored copy"),
        }
    }

    async fn select_week(&mut self, app: &AppState, session: &Session, week: u32) {
        self.selected_week = Some(week);
        self.placeholder = app
            .store
            .user_cache(&session.user_id)
            .await
            .weekly_stats
            .remove(&week);
        debug!(week, cached = self.placeholder.is_some(), "stats week selected");
    }

    /// Stats to draw: the fresh response, or the stored one while loading or
    /// after a superseded request.
    pub fn visible(&self) -> Option<&WeeklyStats> {
        self.state.ready().or_else(|| match self.state {
            ViewState::Failed(_) => None,
            _ => self.placeholder.as_ref(),
        })
    }

    pub fn week_options(&self) -> Vec<u32> {
        match self.current_week {
            Some(current) => (1..=current).rev().collect(),
            None => Vec::new(),
        }
    }
}

/// One-line description of a week's mood mix.
pub fn summary_line(stats: &WeeklyStats) -> String {
    if !stats.completed {
        return format!(
            "Week {} is not complete yet: {} of 7 days logged.",
            stats.week_number, stats.entries_count
        );
    }
    let parts: Vec<String> = stats
        .breakdown
        .iter()
        .map(|share| format!("{:.1}% {}", share.percent, capitalize(&share.category)))
        .collect();
    if parts.is_empty() {
        return format!("Week {} is complete.", stats.week_number);
    }
    parts.join(", ")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryShare;

    fn stats(week: u32, completed: bool) -> WeeklyStats {
        WeeklyStats {
            week_number: week,
            completed,
            average_score: completed.then_some(2.4),
            entries_count: if completed { 7 } else { 4 },
            breakdown: if completed {
                vec![
                    CategoryShare {
                        category: "SAD".into(),
                        percent: 62.5,
                    },
                    CategoryShare {
                        category: "angry".into(),
                        percent: 25.0,
                    },
                ]
            } else {
                Vec::new()
            },
            ai_comment: None,
            activities: Vec::new(),
        }
    }

    #[test]
    fn summary_for_complete_week() {
        assert_eq!(summary_line(&stats(3, true)), "62.5% Sad, 25.0% Angry");
    }

    #[test]
    fn summary_for_incomplete_week() {
        assert_eq!(
            summary_line(&stats(2, false)),
            "Week 2 is not complete yet: 4 of 7 days logged."
        );
    }

    #[test]
    fn placeholder_is_shown_while_loading() {
        let view = StatsController {
            current_week: Some(3),
            selected_week: Some(2),
            placeholder: Some(stats(2, false)),
            state: ViewState::Loading,
        };
        assert_eq!(view.visible().map(|s| s.week_number), Some(2));
        assert_eq!(view.week_options(), vec![3, 2, 1]);
    }

    #[test]
    fn fresh_response_wins_and_failure_hides_placeholder() {
        let mut view = StatsController {
            current_week: Some(3),
            selected_week: Some(3),
            placeholder: Some(stats(3, false)),
            state: ViewState::Ready(stats(3, true)),
        };
        assert!(view.visible().unwrap().completed);

        view.state = ViewState::Failed("Not Found".into());
        assert!(view.visible().is_none());
    }
}
