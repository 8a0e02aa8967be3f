//! pagewatch engine - orchestration layer
//!
//! Wires the core detect-and-report kernel to the outside world: the HTTP
//! content fetcher, the Discord webhook sink, the cron schedule, and the
//! [`Watcher`](watcher::Watcher) that runs bootstrap plus one cycle per tick.

pub mod config;
pub mod fetch;
pub mod notify;
pub mod schedule;
pub mod watcher;

pub use config::{WatchSettings, WebhookCredentials, DEFAULT_DISCORD_API_BASE};
pub use fetch::{fetch_with_retry, ContentFetcher, HttpFetcher};
pub use notify::{DiscordWebhook, NotificationSink};
pub use schedule::{CronSchedule, CronTicker, Ticker};
pub use watcher::{run_watch, CycleOutcome, Watcher};
