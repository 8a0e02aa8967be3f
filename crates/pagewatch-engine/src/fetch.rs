//! Content fetcher
//!
//! One GET per attempt; the body is taken verbatim as text. Non-2xx
//! responses are errors. A connection reset is the one transient failure the
//! default [`RetryPolicy`] retries.

use async_trait::async_trait;
use pagewatch_core::core_types::schema::OP_FETCH;
use pagewatch_core::errors::{Result, WatchError};
use pagewatch_core::{retry_async, ContentSnapshot, RetryPolicy};
use std::error::Error as StdError;
use std::io;

const USER_AGENT: &str = concat!("pagewatch/", env!("CARGO_PKG_VERSION"));

/// Hyper reports a peer that hangs up mid-response with this message rather
/// than an io error.
const CLOSED_BEFORE_COMPLETE: &str = "connection closed before message completed";

/// Retrieves the current content of a URL
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns `Internal` if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WatchError::Internal {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, &e))
    }
}

/// Map a transport error to `ConnectionReset` or `FetchFailed`
pub fn classify_error(url: &str, err: &reqwest::Error) -> WatchError {
    let message = err.to_string();
    if is_connection_reset(err) {
        WatchError::ConnectionReset {
            url: url.to_string(),
            message,
        }
    } else {
        WatchError::FetchFailed {
            url: url.to_string(),
            message,
        }
    }
}

fn is_connection_reset(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
            ) {
                return true;
            }
        }
        if e.to_string().contains(CLOSED_BEFORE_COMPLETE) {
            return true;
        }
        current = e.source();
    }
    false
}

/// Fetch `url` under `policy`, logging each attempt
///
/// # Errors
///
/// Returns the error of the last attempt once the policy gives up.
pub async fn fetch_with_retry(
    fetcher: &dyn ContentFetcher,
    url: &str,
    policy: &RetryPolicy,
) -> Result<ContentSnapshot> {
    let body = retry_async(policy, move |attempt| async move {
        tracing::debug!(op = OP_FETCH, attempt, watch_url = url, "fetching");
        fetcher.fetch(url).await
    })
    .await?;
    tracing::debug!(op = OP_FETCH, bytes = body.len(), watch_url = url, "fetched");
    Ok(ContentSnapshot::new(body))
}
