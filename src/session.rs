use crate::models::{StoredSession, UserProfile};
use crate::reminder;
use crate::storage::ClientStore;
use tracing::info;

/// The signed-in user, injected into every controller that talks to the
/// backend. Created at login, dropped at logout.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: Option<String>, user: Option<UserProfile>) -> Self {
        Self {
            user_id: user_id.into(),
            token,
            user,
        }
    }

    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|user| user.username.as_str())
            .unwrap_or("there")
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            user_id: stored.user_id,
            token: stored.token,
            user: stored.user,
        }
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            token: session.token.clone(),
            user: session.user.clone(),
        }
    }
}

impl ClientStore {
    pub async fn session(&self) -> Option<Session> {
        self.snapshot().await.session.map(Session::from)
    }

    /// Stores the session and arms the one-shot login marker used by the
    /// missed-day reminder.
    pub async fn start_session(&self, session: &Session, now_ms: i64) {
        let stored = StoredSession::from(session);
        self.update(|data| {
            data.session = Some(stored);
            let cache = data.users.entry(session.user_id.clone()).or_default();
            reminder::mark_logged_in(cache, now_ms);
        })
        .await;
        info!(user_id = %session.user_id, "session started");
    }

    /// Clears the session. Per-user caches survive so dismissals and the last
    /// saved entry are still there on the next login.
    pub async fn end_session(&self) -> Option<Session> {
        let ended = self.update(|data| data.session.take()).await;
        if let Some(session) = &ended {
            info!(user_id = %session.user_id, "session ended");
        }
        ended.map(Session::from)
    }

    pub async fn remember_user(&self, user: &UserProfile) {
        self.update(|data| {
            if let Some(session) = data.session.as_mut().filter(|s| s.user_id == user.id) {
                session.user = Some(user.clone());
            }
        })
        .await;
    }
}
