//! Owner notifications for public feedback
//!
//! Callers run notifiers on a detached task; a failure is only logged and
//! never reaches the request that produced the feedback.

use async_trait::async_trait;
use serde::Serialize;
use shared::live::FeedbackKind;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What happened to one of the owner's ideas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackNotice {
    pub owner_id: String,
    pub board_id: i64,
    pub idea_id: i64,
    pub one_liner: String,
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub thumbs_up: u32,
}

#[async_trait]
pub trait OwnerNotifier: Send + Sync {
    async fn notify(&self, notice: &FeedbackNotice) -> Result<(), BoxError>;
}

/// Logs notices; used when no webhook is configured
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl OwnerNotifier for LogNotifier {
    async fn notify(&self, notice: &FeedbackNotice) -> Result<(), BoxError> {
        tracing::info!(
            owner_id = %notice.owner_id,
            idea_id = notice.idea_id,
            kind = ?notice.kind,
            "Feedback received"
        );
        Ok(())
    }
}

/// POSTs notices as JSON to a mail relay or any other webhook
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, BoxError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl OwnerNotifier for WebhookNotifier {
    async fn notify(&self, notice: &FeedbackNotice) -> Result<(), BoxError> {
        self.client
            .post(&self.url)
            .json(notice)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(idea_id = notice.idea_id, "Feedback notice delivered");
        Ok(())
    }
}
