use axum::http::StatusCode;

pub const NETWORK_MESSAGE: &str = "Network error. Please try again.";
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failures of a controller action, as shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error. Please try again.")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("request was superseded")]
    Cancelled,

    #[error("Please sign in again.")]
    NotSignedIn,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Server { status: 404, .. })
    }
}

/// Keeps the first failing field's message; fields are taken in name order so
/// the same input always reports the same problem.
impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let message = fields
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
            .unwrap_or_else(|| "Please check the form and try again.".to_string());
        Self::Validation(message)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Pulls a user-facing message out of an error response body: `message`, then
/// `error`, then the status reason, then a generic fallback.
pub fn extract_error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_slice(body) {
        for key in ["message", "error"] {
            if let Some(text) = fields.get(key).and_then(|value| value.as_str()) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string())
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        tracing::error!("failed to render page: {err}");
        Self::internal(err)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let status = match &err {
            ClientError::Validation(_) => StatusCode::BAD_REQUEST,
            ClientError::Network(_) => StatusCode::BAD_GATEWAY,
            ClientError::Server { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ClientError::Cancelled => StatusCode::CONFLICT,
            ClientError::NotSignedIn => StatusCode::UNAUTHORIZED,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
