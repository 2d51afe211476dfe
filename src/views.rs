use crate::errors::ClientError;

/// Every page the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Home,
    Mood,
    SavedMood,
    PastMood,
    PastSavedMood,
    Statistic,
    Profile,
}

impl View {
    /// Pages listed in the navigation bar.
    pub const NAV: [View; 3] = [View::Home, View::Statistic, View::Profile];

    pub const ALL: [View; 8] = [
        View::Auth,
        View::Home,
        View::Mood,
        View::SavedMood,
        View::PastMood,
        View::PastSavedMood,
        View::Statistic,
        View::Profile,
    ];

    pub fn path(self) -> &'static str {
        match self {
            View::Auth => "/auth",
            View::Home => "/home",
            View::Mood => "/mood",
            View::SavedMood => "/mood/saved",
            View::PastMood => "/mood/past",
            View::PastSavedMood => "/mood/past/saved",
            View::Statistic => "/stats",
            View::Profile => "/profile",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Auth => "Welcome",
            View::Home => "Home",
            View::Mood => "Today's mood",
            View::SavedMood => "Mood saved",
            View::PastMood => "Fill a missed day",
            View::PastSavedMood => "Past mood saved",
            View::Statistic => "Statistics",
            View::Profile => "Profile",
        }
    }

    pub fn requires_session(self) -> bool {
        !matches!(self, View::Auth)
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.path() == path)
    }
}

/// Request lifecycle of a single view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn begin(&mut self) {
        *self = ViewState::Loading;
    }

    /// Settles a request. A superseded request leaves the state untouched so
    /// the newer request decides the outcome.
    pub fn finish(&mut self, result: Result<T, ClientError>) {
        match result {
            Ok(value) => *self = ViewState::Ready(value),
            Err(ClientError::Cancelled) => {}
            Err(err) => *self = ViewState::Failed(err.to_string()),
        }
    }

    pub fn fail(&mut self, err: ClientError) {
        self.finish(Err(err));
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_for_every_view() {
        for view in View::ALL {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
        assert_eq!(View::from_path("/Statistic"), None);
    }

    #[test]
    fn only_auth_is_public() {
        assert!(!View::Auth.requires_session());
        assert!(View::NAV.iter().all(|view| view.requires_session()));
    }

    #[test]
    fn state_transitions() {
        let mut state: ViewState<u8> = ViewState::default();
        assert_eq!(state, ViewState::Idle);

        state.begin();
        assert!(state.is_loading());
        state.finish(Ok(3));
        assert_eq!(state.ready(), Some(&3));

        state.begin();
        state.finish(Err(ClientError::Server {
            status: 500,
            message: "boom".into(),
        }));
        assert_eq!(state.error(), Some("boom"));
    }

    #[test]
    fn cancelled_request_is_not_an_error() {
        let mut state: ViewState<u8> = ViewState::Loading;
        state.finish(Err(ClientError::Cancelled));
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
    }
}
