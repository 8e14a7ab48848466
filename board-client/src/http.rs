//! HTTP client for the board-server REST API

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::ApiResponse;
use shared::models::{
    Column, EmojiReaction, Idea, IdeaCreate, IdeaUpdate, PublicIdea, StatusUpdate, ThumbsUpCount,
};
use std::time::Duration;

use crate::{ClientConfig, ClientError, ClientResult};

/// Header carrying [`ClientConfig::client_id`]
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Board operations used by the reconciliation layer
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Authoritative idea list in display order
    async fn list_ideas(&self, board_id: i64) -> ClientResult<Vec<Idea>>;

    /// Drag and drop: place `idea_id` at `position` in `column`
    async fn move_idea(&self, idea_id: i64, column: Column, position: u32) -> ClientResult<Idea>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    client_id: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            client_id: config.client_id.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<ApiResponse<T>> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut request = self
            .client
            .request(method, &url)
            .header(CLIENT_ID_HEADER, &self.client_id);

        if let Some(token) = self.token.as_ref() {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::data(self.send(Method::GET, path, None).await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        Self::data(self.send(Method::POST, path, Some(body)).await?)
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        Self::data(self.send(Method::PUT, path, Some(body)).await?)
    }

    fn data<T>(envelope: ApiResponse<T>) -> ClientResult<T> {
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing response data".to_string()))
    }

    /// Map the `ApiResponse` envelope (or a bare error body) onto `ClientError`
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text).ok();
            let message = envelope
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| text.clone());
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Validation(message)
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after_ms = envelope
                        .and_then(|e| e.details)
                        .and_then(|d| d.get("retryAfterMs").and_then(|v| v.as_u64()))
                        .unwrap_or(0);
                    ClientError::RateLimited {
                        retry_after: Duration::from_millis(retry_after_ms),
                    }
                }
                _ => ClientError::Internal(message),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    // ========== Owner API ==========

    pub async fn create_idea(&self, board_id: i64, idea: &IdeaCreate) -> ClientResult<Idea> {
        self.post(&format!("/api/boards/{board_id}/ideas"), idea).await
    }

    pub async fn update_idea(&self, idea_id: i64, update: &IdeaUpdate) -> ClientResult<Idea> {
        self.put(&format!("/api/ideas/{idea_id}"), update).await
    }

    pub async fn update_status(&self, idea_id: i64, update: &StatusUpdate) -> ClientResult<Idea> {
        self.put(&format!("/api/ideas/{idea_id}/status"), update).await
    }

    pub async fn delete_idea(&self, idea_id: i64) -> ClientResult<()> {
        self.send::<serde_json::Value>(Method::DELETE, &format!("/api/ideas/{idea_id}"), None)
            .await?;
        Ok(())
    }

    // ========== Public API ==========

    pub async fn public_ideas(&self, board_id: i64) -> ClientResult<Vec<PublicIdea>> {
        self.get(&format!("/api/public/boards/{board_id}/ideas")).await
    }

    /// Returns the new thumbs-up count
    pub async fn thumbs_up(&self, idea_id: i64) -> ClientResult<u32> {
        let count: ThumbsUpCount = self
            .post(&format!("/api/public/ideas/{idea_id}/thumbs-up"), &json!({}))
            .await?;
        Ok(count.thumbs_up)
    }

    pub async fn add_reaction(&self, idea_id: i64, emoji: &str) -> ClientResult<Vec<EmojiReaction>> {
        self.post(
            &format!("/api/public/ideas/{idea_id}/reactions"),
            &json!({ "emoji": emoji }),
        )
        .await
    }
}

#[async_trait]
impl BoardApi for HttpClient {
    async fn list_ideas(&self, board_id: i64) -> ClientResult<Vec<Idea>> {
        self.get(&format!("/api/boards/{board_id}/ideas")).await
    }

    async fn move_idea(&self, idea_id: i64, column: Column, position: u32) -> ClientResult<Idea> {
        self.put(
            &format!("/api/ideas/{idea_id}/position"),
            &json!({ "column": column, "position": position }),
        )
        .await
    }
}
