use crate::errors::{extract_error_message, ClientError};
use crate::models::{
    Credentials, LoginResponse, PastMoodRequest, SubmitMoodRequest, UserInfo, UserProfile,
    WeekItem, WeekNumberResponse, WeeklyStats,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// JSON client for the Moodify backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn user(&self, user_id: &str, token: Option<&str>) -> Result<UserProfile, ClientError> {
        self.get_json(&format!("/api/users/{user_id}"), token).await
    }

    pub async fn week(&self, user_id: &str, token: Option<&str>) -> Result<Vec<WeekItem>, ClientError> {
        self.get_json(&format!("/api/users/{user_id}/week"), token).await
    }

    pub async fn history(&self, user_id: &str, token: Option<&str>) -> Result<Vec<WeekItem>, ClientError> {
        self.get_json(&format!("/api/users/{user_id}/history"), token).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let request = self.http.post(self.url("/api/users/login")).json(credentials);
        read_json(send(request).await?).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<UserProfile, ClientError> {
        let request = self.http.post(self.url("/api/users/register")).json(credentials);
        read_json(send(request).await?).await
    }

    pub async fn submit_mood(
        &self,
        user_id: &str,
        token: Option<&str>,
        body: &SubmitMoodRequest,
    ) -> Result<(), ClientError> {
        self.post(&format!("/api/users/{user_id}/mood"), token, body).await?;
        Ok(())
    }

    pub async fn submit_past_mood(
        &self,
        user_id: &str,
        token: Option<&str>,
        body: &PastMoodRequest,
    ) -> Result<(), ClientError> {
        self.post(&format!("/api/mood-entries/users/{user_id}/mood/past"), token, body)
            .await?;
        Ok(())
    }

    pub async fn current_week_number(&self, user_id: &str, token: Option<&str>) -> Result<u32, ClientError> {
        let response: WeekNumberResponse = self
            .get_json(&format!("/api/users/{user_id}/week-number"), token)
            .await?;
        Ok(response.week_number)
    }

    pub async fn weekly_stats(
        &self,
        user_id: &str,
        token: Option<&str>,
        week_number: Option<u32>,
    ) -> Result<WeeklyStats, ClientError> {
        let path = match week_number {
            Some(week) => format!("/api/users/{user_id}/stats/weekly?weekNumber={week}"),
            None => format!("/api/users/{user_id}/stats/weekly"),
        };
        self.get_json(&path, token).await
    }

    pub async fn user_info(&self, user_id: &str, token: Option<&str>) -> Result<UserInfo, ClientError> {
        self.get_json(&format!("/api/user/{user_id}/info"), token).await
    }

    pub async fn update_user_info(
        &self,
        user_id: &str,
        token: Option<&str>,
        info: &UserInfo,
    ) -> Result<UserInfo, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/api/user/{user_id}/info")))
            .json(info);
        read_json(send(authorize(request, token)).await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ClientError> {
        let request = self.http.get(self.url(path));
        read_json(send(authorize(request, token)).await?).await
    }

    async fn post<B: Serialize>(&self, path: &str, token: Option<&str>, body: &B) -> Result<Response, ClientError> {
        let request = self.http.post(self.url(path)).json(body);
        send(authorize(request, token)).await
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => request.bearer_auth(token),
        _ => request,
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request.send().await.map_err(|err| {
        warn!("backend request failed: {err}");
        ClientError::from(err)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let body = response.bytes().await.unwrap_or_default();
    let message = extract_error_message(status, &body);
    debug!(status = status.as_u16(), %url, %message, "backend rejected request");
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| {
        warn!("unexpected backend payload: {err}");
        ClientError::Network(err.to_string())
    })
}
