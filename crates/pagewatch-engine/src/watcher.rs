//! Watch orchestration
//!
//! Bootstrap stores the first snapshot unconditionally. Each cycle then
//! fetches, diffs against the cached snapshot, notifies on change and only
//! then replaces the cached snapshot. A failed cycle leaves the cache as it
//! was, so the same change is reported again on the next tick.

use crate::config::WatchSettings;
use crate::fetch::{fetch_with_retry, ContentFetcher};
use crate::notify::NotificationSink;
use crate::schedule::{CronSchedule, CronTicker, Ticker};
use pagewatch_core::core_types::schema::{
    OP_BOOTSTRAP, OP_NOTIFY, OP_VALIDATE_SCHEDULE, OP_WATCH_CYCLE,
};
use pagewatch_core::core_types::CycleId;
use pagewatch_core::errors::{ExError, Result, WatchError};
use pagewatch_core::{
    diff_lines, format_notification, has_change, log_op_end, log_op_error, log_op_start,
    ContentSnapshot, RetryPolicy, VersionCache, WatchTarget,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Content changed and the notification was delivered
    Notified { hunk_count: usize },
    /// Content identical to the cached snapshot
    Unchanged,
    /// No cached snapshot existed; the fetched one was stored without
    /// notifying
    Baselined,
    /// Another cycle was still running
    Skipped,
}

impl CycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notified { .. } => "notified",
            Self::Unchanged => "unchanged",
            Self::Baselined => "baselined",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Watches one target
///
/// The cache lock doubles as the re-entrancy guard: a cycle that finds it
/// held returns [`CycleOutcome::Skipped`] instead of waiting.
pub struct Watcher {
    target: WatchTarget,
    fetcher: Arc<dyn ContentFetcher>,
    sink: Arc<dyn NotificationSink>,
    retry: RetryPolicy,
    cache: Mutex<VersionCache>,
}

impl Watcher {
    pub fn new(
        target: WatchTarget,
        fetcher: Arc<dyn ContentFetcher>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            target,
            fetcher,
            sink,
            retry: RetryPolicy::default(),
            cache: Mutex::new(VersionCache::new()),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Snapshot currently held for this target
    pub async fn cached_snapshot(&self) -> Option<ContentSnapshot> {
        self.cache.lock().await.get(self.target.name())
    }

    /// Fetch the initial snapshot and store it without diffing
    ///
    /// # Errors
    ///
    /// Returns the fetch error once retries are exhausted. Nothing is stored.
    pub async fn bootstrap(&self) -> Result<()> {
        let start = Instant::now();
        let cycle_id = CycleId::new();
        let name = self.target.name();
        log_op_start!(OP_BOOTSTRAP, watch_name = name, cycle_id = %cycle_id);

        let mut cache = self.cache.lock().await;
        match fetch_with_retry(self.fetcher.as_ref(), self.target.url(), &self.retry).await {
            Ok(snapshot) => {
                let bytes = snapshot.len();
                cache.set(name, snapshot);
                log_op_end!(
                    OP_BOOTSTRAP,
                    since = start,
                    watch_name = name,
                    cycle_id = %cycle_id,
                    bytes = bytes
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    OP_BOOTSTRAP,
                    self.error_context(&err),
                    since = start,
                    watch_name = name,
                    cycle_id = %cycle_id
                );
                Err(err)
            }
        }
    }

    /// Run one detect-and-report cycle
    ///
    /// # Errors
    ///
    /// Returns the fetch or delivery error. The cached snapshot is left
    /// untouched in that case.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let name = self.target.name();
        let Ok(mut cache) = self.cache.try_lock() else {
            tracing::warn!(
                op = OP_WATCH_CYCLE,
                watch_name = name,
                outcome = CycleOutcome::Skipped.as_str(),
                "previous cycle still running; skipping this tick"
            );
            return Ok(CycleOutcome::Skipped);
        };

        let start = Instant::now();
        let cycle_id = CycleId::new();
        log_op_start!(OP_WATCH_CYCLE, watch_name = name, cycle_id = %cycle_id);

        let result = self.detect_and_report(&mut cache).await;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    OP_WATCH_CYCLE,
                    since = start,
                    watch_name = name,
                    cycle_id = %cycle_id,
                    outcome = outcome.as_str()
                );
            }
            Err(err) => {
                log_op_error!(
                    OP_WATCH_CYCLE,
                    self.error_context(err),
                    since = start,
                    watch_name = name,
                    cycle_id = %cycle_id
                );
            }
        }
        result
    }

    async fn detect_and_report(&self, cache: &mut VersionCache) -> Result<CycleOutcome> {
        let name = self.target.name();
        let current =
            fetch_with_retry(self.fetcher.as_ref(), self.target.url(), &self.retry).await?;

        let Some(previous) = cache.get(name) else {
            tracing::warn!(watch_name = name, "no cached snapshot; storing current content as baseline");
            cache.set(name, current);
            return Ok(CycleOutcome::Baselined);
        };

        let diff = diff_lines(previous.as_str(), current.as_str());
        let outcome = if has_change(&diff) {
            let hunk_count = diff.len();
            tracing::info!(
                watch_name = name,
                hunk_count,
                additions = diff.additions(),
                deletions = diff.deletions(),
                "change detected"
            );
            self.notify(&format_notification(name, &diff.hunks)).await?;
            CycleOutcome::Notified { hunk_count }
        } else {
            tracing::info!(watch_name = name, "no change detected");
            CycleOutcome::Unchanged
        };

        cache.set(name, current);
        Ok(outcome)
    }

    async fn notify(&self, message: &str) -> Result<()> {
        let start = Instant::now();
        log_op_start!(OP_NOTIFY, watch_name = self.target.name());
        match self.sink.send(message).await {
            Ok(()) => {
                log_op_end!(
                    OP_NOTIFY,
                    since = start,
                    watch_name = self.target.name()
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    OP_NOTIFY,
                    self.error_context(&err),
                    since = start,
                    watch_name = self.target.name()
                );
                Err(err)
            }
        }
    }

    /// Canonical form of `err` tagged with this target
    fn error_context(&self, err: &WatchError) -> ExError {
        ExError::from(err.clone()).with_watch_name(self.target.name())
    }

    /// Run a cycle on every tick until the ticker ends
    ///
    /// Cycle failures are logged and the loop waits for the next tick.
    pub async fn run(&self, ticker: &mut dyn Ticker) {
        while let Some(tick) = ticker.next_tick().await {
            tracing::debug!(watch_name = self.target.name(), tick = %tick, "tick");
            // Already logged with its cycle id
            let _ = self.run_cycle().await;
        }
    }
}

/// Validate the schedule, bootstrap, then watch forever
///
/// # Errors
///
/// - `InvalidSchedule` before anything is fetched
/// - the bootstrap fetch error
pub async fn run_watch(
    settings: &WatchSettings,
    fetcher: Arc<dyn ContentFetcher>,
    sink: Arc<dyn NotificationSink>,
) -> Result<()> {
    let start = Instant::now();
    let schedule = CronSchedule::parse(&settings.cron).map_err(|err| {
        log_op_error!(
            OP_VALIDATE_SCHEDULE,
            ExError::from(err.clone()).with_watch_name(settings.target.name()),
            since = start,
            watch_name = settings.target.name()
        );
        err
    })?;

    let watcher = Watcher::new(settings.target.clone(), fetcher, sink);
    watcher.bootstrap().await?;

    tracing::info!(
        watch_name = watcher.target().name(),
        watch_url = watcher.target().url(),
        cron = schedule.expression(),
        "watching"
    );
    let mut ticker = CronTicker::new(schedule);
    watcher.run(&mut ticker).await;

    Err(WatchError::Internal {
        message: "schedule produced no further fire times".to_string(),
    })
}
