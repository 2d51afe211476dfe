pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod dates;
pub mod errors;
pub mod fetch;
pub mod handlers;
pub mod home;
pub mod models;
pub mod mood;
pub mod profile;
pub mod reminder;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod views;
pub mod week;

pub use api::ApiClient;
pub use app::router;
pub use config::Config;
pub use errors::{AppError, ClientError};
pub use session::Session;
pub use state::AppState;
pub use storage::{load_data, ClientStore};
pub use views::{View, ViewState};
pub use week::{missing_days, reconcile_week};
