use crate::handlers;
use crate::state::AppState;
use crate::views::View;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(View::Auth.path(), get(handlers::auth_page))
        .route("/auth/login", post(handlers::login))
        .route("/auth/register", post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route(View::Home.path(), get(handlers::home))
        .route("/reminder/dismiss", post(handlers::dismiss_reminder))
        .route(View::Mood.path(), get(handlers::mood_page).post(handlers::submit_mood))
        .route(View::SavedMood.path(), get(handlers::saved_mood))
        .route(
            View::PastMood.path(),
            get(handlers::past_mood_page).post(handlers::submit_past_mood),
        )
        .route(View::PastSavedMood.path(), get(handlers::saved_past_mood))
        .route(View::Statistic.path(), get(handlers::stats_page))
        .route(
            View::Profile.path(),
            get(handlers::profile_page).post(handlers::update_profile),
        )
        .route("/api/week", get(handlers::get_week))
        .route("/api/missing-days", get(handlers::get_missing_days))
        .with_state(state)
}
