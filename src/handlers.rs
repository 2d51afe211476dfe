use crate::auth::{self, AuthController, AuthMode};
use crate::dates::{date_key, now_millis, today};
use crate::errors::{AppError, ClientError};
use crate::fetch::FetchKind;
use crate::home::{fetch_week, HomeController};
use crate::models::{Mood, WeekItem};
use crate::mood::{MoodController, PastMoodController};
use crate::profile::ProfileController;
use crate::reminder;
use crate::session::Session;
use crate::state::AppState;
use crate::stats::StatsController;
use crate::ui;
use crate::views::{View, ViewState};
use crate::week::{default_backfill_date, missing_days};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct MoodForm {
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct PastMoodForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct DismissForm {
    pub date: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub week: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub hobbies: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MissingDaysResponse {
    pub today: String,
    pub dates: Vec<String>,
    pub selected: Option<String>,
}

type Page = Result<Response, Response>;

fn to_auth() -> Response {
    Redirect::to(View::Auth.path()).into_response()
}

fn to_view(view: View) -> Response {
    Redirect::to(view.path()).into_response()
}

fn html(page: Result<String, askama::Error>) -> Page {
    page.map(|body| Html(body).into_response())
        .map_err(|err| AppError::from(err).into_response())
}

/// Applies a view's access rule: signed-out visitors only reach the auth
/// page and signed-in users skip it.
async fn enter(state: &AppState, view: View) -> Result<Option<Session>, Response> {
    let session = state.store.session().await;
    match (view.requires_session(), session) {
        (true, None) => Err(to_auth()),
        (false, Some(_)) => Err(to_view(View::Home)),
        (_, session) => Ok(session),
    }
}

async fn signed_in(state: &AppState, view: View) -> Result<Session, Response> {
    enter(state, view).await?.ok_or_else(to_auth)
}

pub async fn index(State(state): State<AppState>) -> Response {
    match state.store.session().await {
        Some(_) => to_view(View::Home),
        None => to_auth(),
    }
}

pub async fn auth_page(State(state): State<AppState>) -> Page {
    enter(&state, View::Auth).await?;
    html(ui::render_auth(&AuthController::new(AuthMode::Login)))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Page {
    authenticate(&state, AuthMode::Login, form).await
}

pub async fn register(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Page {
    authenticate(&state, AuthMode::Register, form).await
}

async fn authenticate(state: &AppState, mode: AuthMode, form: CredentialsForm) -> Page {
    let mut controller = AuthController::new(mode);
    controller.submit(state, &form.username, &form.password).await;
    match controller.state {
        ViewState::Ready(_) => Ok(to_view(View::Home)),
        _ => html(ui::render_auth(&controller)),
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    auth::sign_out(&state).await;
    to_auth()
}

pub async fn home(State(state): State<AppState>) -> Page {
    let session = signed_in(&state, View::Home).await?;
    let mut controller = HomeController::default();
    controller.load(&state, &session, today(), now_millis()).await;
    html(ui::render_home(&session, &controller.state))
}

pub async fn dismiss_reminder(State(state): State<AppState>, Form(form): Form<DismissForm>) -> Page {
    let session = signed_in(&state, View::Home).await?;
    state
        .store
        .update_user(&session.user_id, |cache| reminder::dismiss(cache, &form.date))
        .await;
    info!(user_id = %session.user_id, date = %form.date, "reminder dismissed");

    let next = form
        .next
        .as_deref()
        .and_then(View::from_path)
        .filter(|view| view.requires_session())
        .unwrap_or(View::Home);
    Ok(to_view(next))
}

pub async fn mood_page(State(state): State<AppState>) -> Page {
    let session = signed_in(&state, View::Mood).await?;
    html(ui::render_mood(&session, &MoodController::default()))
}

pub async fn submit_mood(State(state): State<AppState>, Form(form): Form<MoodForm>) -> Page {
    let session = signed_in(&state, View::Mood).await?;
    let mut controller = MoodController::default();
    if let Some(mood) = form.mood.and_then(Mood::from_value) {
        controller.select(mood);
    }
    controller.confirm(&state, &session, today(), &form.note).await;
    match controller.state {
        ViewState::Ready(_) => Ok(to_view(View::SavedMood)),
        _ => html(ui::render_mood(&session, &controller)),
    }
}

pub async fn saved_mood(State(state): State<AppState>) -> Page {
    let session = signed_in(&state, View::SavedMood).await?;
    let cache = state.store.user_cache(&session.user_id).await;
    html(ui::render_saved(View::SavedMood, &session, cache.last_mood_entry.as_ref()))
}

pub async fn past_mood_page(State(state): State<AppState>) -> Page {
    let session = signed_in(&state, View::PastMood).await?;
    let mut controller = PastMoodController::default();
    controller.load(&state, &session, today()).await;
    html(ui::render_past_mood(&session, &controller))
}

pub async fn submit_past_mood(State(state): State<AppState>, Form(form): Form<PastMoodForm>) -> Page {
    let session = signed_in(&state, View::PastMood).await?;
    let today = today();
    let mut controller = PastMoodController::default();
    controller.load(&state, &session, today).await;
    // Without the gap list the submitted date cannot be checked; the page
    // shows why the week is missing instead.
    if controller.week.ready().is_none() {
        return html(ui::render_past_mood(&session, &controller));
    }
    if let Some(mood) = form.mood.and_then(Mood::from_value) {
        controller.select_mood(mood);
    }
    if let Some(date) = form.date.as_deref() {
        if let Err(err) = controller.select_date(date) {
            controller.save.fail(err);
            return html(ui::render_past_mood(&session, &controller));
        }
    }

    controller.confirm(&state, &session, today, &form.note).await;
    match controller.save {
        ViewState::Ready(_) => Ok(to_view(View::PastSavedMood)),
        _ => html(ui::render_past_mood(&session, &controller)),
    }
}

pub async fn saved_past_mood(State(state): State<AppState>) -> Page {
    let session = signed_in(&state, View::PastSavedMood).await?;
    let cache = state.store.user_cache(&session.user_id).await;
    html(ui::render_saved(
        View::PastSavedMood,
        &session,
        cache.last_past_mood_entry.as_ref(),
    ))
}

pub async fn stats_page(State(state): State<AppState>, Query(query): Query<StatsQuery>) -> Page {
    let session = signed_in(&state, View::Statistic).await?;
    let mut controller = StatsController::default();
    controller.load(&state, &session, query.week).await;
    html(ui::render_stats(&session, &controller))
}

pub async fn profile_page(State(state): State<AppState>) -> Page {
    let session = signed_in(&state, View::Profile).await?;
    let mut controller = ProfileController::default();
    controller.load(&state, &session).await;
    html(ui::render_profile(&session, &controller))
}

pub async fn update_profile(State(state): State<AppState>, Form(form): Form<ProfileForm>) -> Page {
    let session = signed_in(&state, View::Profile).await?;
    let mut controller = ProfileController::default();
    controller
        .update(&state, &session, &form.birth_date, &form.gender, &form.hobbies)
        .await;
    controller.load(&state, &session).await;
    html(ui::render_profile(&session, &controller))
}

async fn require_session(state: &AppState) -> Result<Session, AppError> {
    state
        .store
        .session()
        .await
        .ok_or_else(|| AppError::from(ClientError::NotSignedIn))
}

pub async fn get_week(State(state): State<AppState>) -> Result<Json<Vec<WeekItem>>, AppError> {
    let session = require_session(&state).await?;
    let week = fetch_week(&state, &session, FetchKind::WeekApi).await?;
    Ok(Json(week))
}

pub async fn get_missing_days(State(state): State<AppState>) -> Result<Json<MissingDaysResponse>, AppError> {
    let session = require_session(&state).await?;
    let week = fetch_week(&state, &session, FetchKind::WeekApi).await?;
    let today = date_key(today());
    let dates = missing_days(&week, &today);
    let selected = default_backfill_date(&dates).map(str::to_string);
    Ok(Json(MissingDaysResponse {
        today,
        dates,
        selected,
    }))
}
