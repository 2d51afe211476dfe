use crate::dates::now_millis;
use crate::errors::ClientError;
use crate::models::{Credentials, UserProfile};
use crate::session::Session;
use crate::state::AppState;
use crate::views::ViewState;
use tracing::{info, warn};
use validator::Validate;

/// Bounds mirrored into the form inputs; `Credentials` enforces them.
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Checks the form locally so invalid input never reaches the backend. The
/// username is trimmed before its length is checked.
pub fn validate_credentials(username: &str, password: &str) -> Result<Credentials, ClientError> {
    let credentials = Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    credentials.validate()?;
    Ok(credentials)
}

/// The login / registration form.
pub struct AuthController {
    pub mode: AuthMode,
    pub username: String,
    pub state: ViewState<Session>,
}

impl AuthController {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            state: ViewState::Idle,
        }
    }

    pub async fn submit(&mut self, app: &AppState, username: &str, password: &str) {
        self.username = username.trim().to_string();
        let credentials = match validate_credentials(username, password) {
            Ok(credentials) => credentials,
            Err(err) => {
                self.state.fail(err);
                return;
            }
        };

        self.state.begin();
        let result = match self.mode {
            AuthMode::Login => sign_in(app, &credentials).await,
            AuthMode::Register => register(app, &credentials).await,
        };
        if let Err(err) = &result {
            warn!(username = %credentials.username, mode = ?self.mode, "authentication failed: {err}");
        }
        self.state.finish(result);
    }
}

async fn register(app: &AppState, credentials: &Credentials) -> Result<Session, ClientError> {
    let user = app.api.register(credentials).await?;
    info!(user_id = %user.id, "registered");
    sign_in(app, credentials).await
}

async fn sign_in(app: &AppState, credentials: &Credentials) -> Result<Session, ClientError> {
    let response = app.api.login(credentials).await?;
    let user = UserProfile {
        id: response.id.clone(),
        username: response
            .username
            .unwrap_or_else(|| credentials.username.clone()),
        created_at: None,
    };
    let session = Session::new(response.id, response.token, Some(user));

    app.fetches.cancel_all().await;
    app.store.start_session(&session, now_millis()).await;
    Ok(session)
}

/// Ends the current session and aborts its in-flight requests.
pub async fn sign_out(app: &AppState) -> Option<Session> {
    app.fetches.cancel_all().await;
    app.store.end_session().await
}
