//! Notification sink
//!
//! Messages go to a Discord webhook as `{"content": "<message>"}`. Delivery
//! is attempted once per detected change.

use crate::config::WebhookCredentials;
use async_trait::async_trait;
use pagewatch_core::errors::{Result, WatchError};
use pagewatch_core_types::Sensitive;
use serde::Serialize;

/// Delivers a rendered change message
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Discord webhook sink
///
/// The endpoint embeds the webhook token, so it is held redacted and
/// transport errors are stripped of their URL before being reported.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: reqwest::Client,
    endpoint: Sensitive<String>,
}

impl DiscordWebhook {
    /// # Errors
    ///
    /// Returns `Internal` if the HTTP client cannot be built.
    pub fn new(api_base: &str, credentials: &WebhookCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| WatchError::Internal {
                message: format!("failed to build webhook client: {e}"),
            })?;
        Ok(Self::with_client(client, api_base, credentials))
    }

    pub fn with_client(
        client: reqwest::Client,
        api_base: &str,
        credentials: &WebhookCredentials,
    ) -> Self {
        Self {
            client,
            endpoint: credentials.endpoint(api_base),
        }
    }
}

#[async_trait]
impl NotificationSink for DiscordWebhook {
    async fn send(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.expose().as_str())
            .json(&WebhookPayload { content: message })
            .send()
            .await
            .map_err(|e| WatchError::DeliveryFailed {
                message: e.without_url().to_string(),
                status: None,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(WatchError::DeliveryFailed {
            message: format!("webhook rejected the message: {}", body.trim()),
            status: Some(status.as_u16()),
        })
    }
}
