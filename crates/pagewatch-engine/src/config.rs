//! Watch settings
//!
//! Values arrive from the CLI (flags or the `CRON`, `WATCH_URL`,
//! `WATCH_NAME`, `DISCORD_WEBHOOK_ID` and `DISCORD_WEBHOOK_TOKEN` environment
//! variables) and are validated here. The cron expression is checked later,
//! by the scheduling gate in [`run_watch`](crate::watcher::run_watch).

use pagewatch_core::errors::{Result, WatchError};
use pagewatch_core::WatchTarget;
use pagewatch_core_types::Sensitive;
use reqwest::Url;

pub const ENV_CRON: &str = "CRON";
pub const ENV_WATCH_URL: &str = "WATCH_URL";
pub const ENV_WATCH_NAME: &str = "WATCH_NAME";
pub const ENV_DISCORD_WEBHOOK_ID: &str = "DISCORD_WEBHOOK_ID";
pub const ENV_DISCORD_WEBHOOK_TOKEN: &str = "DISCORD_WEBHOOK_TOKEN";

/// Discord REST API root the webhook URL is built from
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";

/// Webhook id and token; the token never appears in `Debug` output
#[derive(Debug, Clone)]
pub struct WebhookCredentials {
    pub id: String,
    pub token: Sensitive<String>,
}

impl WebhookCredentials {
    /// `<api_base>/webhooks/<id>/<token>`, kept redacted
    pub fn endpoint(&self, api_base: &str) -> Sensitive<String> {
        let base = api_base.trim_end_matches('/');
        let id = &self.id;
        self.token
            .clone()
            .map(|token| format!("{base}/webhooks/{id}/{token}"))
    }
}

/// Everything one running instance needs
#[derive(Debug, Clone)]
pub struct WatchSettings {
    /// Recurrence expression, validated before bootstrap
    pub cron: String,
    pub target: WatchTarget,
    pub webhook: WebhookCredentials,
}

impl WatchSettings {
    /// Validate raw values into settings
    ///
    /// # Errors
    ///
    /// - `MissingConfig` if any value is empty
    /// - `InvalidConfig` if the watch URL is not an absolute http(s) URL
    pub fn new(
        cron: impl Into<String>,
        watch_url: impl Into<String>,
        watch_name: impl Into<String>,
        webhook_id: impl Into<String>,
        webhook_token: impl Into<String>,
    ) -> Result<Self> {
        let cron = required(ENV_CRON, cron.into())?;
        let watch_url = required(ENV_WATCH_URL, watch_url.into())?;
        let watch_name = required(ENV_WATCH_NAME, watch_name.into())?;
        let webhook_id = required(ENV_DISCORD_WEBHOOK_ID, webhook_id.into())?;
        let webhook_token = required(ENV_DISCORD_WEBHOOK_TOKEN, webhook_token.into())?;

        validate_url(&watch_url)?;

        Ok(Self {
            cron,
            target: WatchTarget::new(watch_name, watch_url),
            webhook: WebhookCredentials {
                id: webhook_id,
                token: Sensitive::new(webhook_token),
            },
        })
    }
}

fn required(key: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WatchError::MissingConfig {
            key: key.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| WatchError::InvalidConfig {
        key: ENV_WATCH_URL.to_string(),
        reason: format!("'{raw}' is not a valid URL: {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(WatchError::InvalidConfig {
            key: ENV_WATCH_URL.to_string(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}
