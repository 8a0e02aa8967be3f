//! Shared fakes for engine integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use chrono::{DateTime, Local};
use pagewatch_core::errors::{Result, WatchError};
use pagewatch_engine::{ContentFetcher, NotificationSink, Ticker};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const WATCH_URL: &str = "https://status.example.com/";

pub fn reset_error() -> WatchError {
    WatchError::ConnectionReset {
        url: WATCH_URL.to_string(),
        message: "connection reset by peer".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scripted fetcher
// ---------------------------------------------------------------------------

/// Returns queued responses in order; panics when the script runs out.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        })
    }

    pub fn slow<I>(responses: I, delay: Duration) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentFetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fetcher script exhausted")
    }
}

// ---------------------------------------------------------------------------
// Recording sink
// ---------------------------------------------------------------------------

/// Records every message; fails the calls listed in `failures` (1-based).
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    failures: Vec<usize>,
    calls: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(failures: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            failures,
            ..Self::default()
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, message: &str) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failures.contains(&call) {
            return Err(WatchError::DeliveryFailed {
                message: "webhook rejected the message: rate limited".to_string(),
                status: Some(429),
            });
        }
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// Fires immediately a fixed number of times.
pub struct CountingTicker {
    remaining: usize,
}

impl CountingTicker {
    pub fn new(ticks: usize) -> Self {
        Self { remaining: ticks }
    }
}

#[async_trait]
impl Ticker for CountingTicker {
    async fn next_tick(&mut self) -> Option<DateTime<Local>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(Local::now())
    }
}

// ---------------------------------------------------------------------------
// Canned HTTP server
// ---------------------------------------------------------------------------

/// One scripted reply per accepted connection.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond { status: u16, body: String },
    /// Close the socket with RST before writing anything
    Reset,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::Respond {
            status,
            body: body.to_string(),
        }
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CannedServer {
    /// Serve `replies` in order, one connection each.
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);

        tokio::spawn(async move {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                captured.lock().unwrap().push(request);
                match reply {
                    Reply::Respond { status, body } => {
                        let response = format!(
                            "HTTP/1.1 {status} Canned\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = stream.write_all(response.as_bytes()).await;
                        let _ = stream.shutdown().await;
                    }
                    Reply::Reset => {
                        #[allow(deprecated)]
                        let _ = stream.set_linger(Some(Duration::ZERO));
                        drop(stream);
                    }
                }
            }
        });

        Self { base_url, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    CapturedRequest { method, path, body }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
