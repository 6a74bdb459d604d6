//! Slack Sink - Incoming Webhook Poster
//!
//! Posts plain text messages to a Slack incoming webhook.
//!
//! # Wire Format
//!
//! ```text
//! POST <webhook-url>
//! Content-Type: application/json
//!
//! {"text": "<message>"}
//! ```
//!
//! Slack answers `200 ok` on success. Anything else is reported as an error
//! carrying the status and the response body. Nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors produced while posting to a webhook.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to encode slack message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("non 200 status received from slack: {status}, {body}")]
    Status { status: StatusCode, body: String },
}

/// Something that can deliver a text message to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Posts `text` to the channel.
    async fn post(&self, text: &str) -> Result<(), NotifyError>;
}

/// Body of an incoming webhook request.
#[derive(Debug, Serialize)]
pub struct NotificationMessage<'a> {
    pub text: &'a str,
}

/// Notifier backed by a Slack incoming webhook URL.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    http: Client,
    webhook_url: String,
}

impl SlackWebhook {
    /// Creates a webhook notifier that sends through the given HTTP client.
    pub fn new(webhook_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
        }
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn post(&self, text: &str) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(&NotificationMessage { text })?;

        debug!(bytes = body.len(), "posting message to slack webhook");

        let response = self
            .http
            .post(&self.webhook_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            return Err(NotifyError::Status { status, body });
        }

        debug!(%status, "slack webhook accepted message");
        Ok(())
    }
}
