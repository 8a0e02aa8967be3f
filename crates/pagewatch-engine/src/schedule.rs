//! Cron scheduling
//!
//! Accepts the common five-field form (`min hour dom month dow`) and the
//! six-field form with a leading seconds field. Day-of-week numbers follow
//! the classic convention where both 0 and 7 mean Sunday. Numeric items,
//! including ranges and steps, are expanded into an explicit list of day
//! names before the expression reaches the `cron` crate, which counts days
//! from 1. Fire times are computed in local time.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use pagewatch_core::errors::{Result, WatchError};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A validated recurrence expression
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: cron::Schedule,
}

impl CronSchedule {
    /// # Errors
    ///
    /// Returns `InvalidSchedule` naming the expression and the reason.
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |reason: String| WatchError::InvalidSchedule {
            expression: expression.to_string(),
            reason,
        };
        let normalized = normalize(expression).map_err(invalid)?;
        let schedule =
            cron::Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn validate(expression: &str) -> bool {
        Self::parse(expression).is_ok()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `after`
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(after).next()
    }

    /// Fire times in `(after, until]`
    pub fn count_between<Tz: TimeZone>(&self, after: &DateTime<Tz>, until: &DateTime<Tz>) -> usize {
        self.schedule
            .after(after)
            .take_while(|t| t <= until)
            .count()
    }
}

fn normalize(expression: &str) -> std::result::Result<String, String> {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    let (seconds, rest) = match fields.len() {
        5 => ("0", &fields[..]),
        6 => (fields[0], &fields[1..]),
        n => return Err(format!("expected 5 or 6 fields, found {n}")),
    };
    let day_of_week = normalize_day_of_week(rest[4])?;
    Ok(format!(
        "{seconds} {} {} {} {} {day_of_week}",
        rest[0], rest[1], rest[2], rest[3]
    ))
}

fn normalize_day_of_week(field: &str) -> std::result::Result<String, String> {
    field
        .split(',')
        .map(normalize_day_item)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(|items| items.join(","))
}

fn normalize_day_item(item: &str) -> std::result::Result<String, String> {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (item, None),
    };
    if step.is_none() && (base == "*" || base == "?") {
        return Ok(base.to_string());
    }
    if !base.starts_with(|c: char| c.is_ascii_digit() || c == '*') {
        // Day names are already in the `cron` crate's terms
        return Ok(item.to_string());
    }

    let step = match step {
        Some(step) => step
            .parse::<usize>()
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| format!("day-of-week step '{step}' must be a positive number"))?,
        None => 1,
    };
    let (first, last) = match base {
        "*" => (0, 6),
        _ => match base.split_once('-') {
            Some((start, end)) => (day_number(start)?, day_number(end)?),
            // `n/step` runs to the end of the week
            None if item.contains('/') => (day_number(base)?, 7),
            None => {
                let day = day_number(base)?;
                (day, day)
            }
        },
    };
    if first > last {
        return Err(format!("day-of-week range '{item}' runs backwards"));
    }

    let days: BTreeSet<usize> = (first..=last).step_by(step).map(|day| day % 7).collect();
    Ok(days
        .into_iter()
        .map(|day| DAY_NAMES[day])
        .collect::<Vec<_>>()
        .join(","))
}

/// Parse a numeric day where both 0 and 7 are Sunday
fn day_number(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n <= 7 => Ok(n),
        Ok(n) => Err(format!("day-of-week value {n} is out of range 0-7")),
        Err(_) => Err(format!("day-of-week value '{value}' is not a number")),
    }
}

/// Source of cycle triggers
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next trigger; `None` ends the watch loop.
    async fn next_tick(&mut self) -> Option<DateTime<Local>>;
}

/// Sleeps until each fire time of a [`CronSchedule`]
///
/// Fire times that passed while a cycle was still running are coalesced into
/// the next one and counted.
#[derive(Debug)]
pub struct CronTicker {
    schedule: CronSchedule,
    last_tick: Option<DateTime<Local>>,
    skipped_ticks: u64,
}

impl CronTicker {
    pub fn new(schedule: CronSchedule) -> Self {
        Self {
            schedule,
            last_tick: None,
            skipped_ticks: 0,
        }
    }

    /// Ticks missed so far because a cycle overran
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }
}

#[async_trait]
impl Ticker for CronTicker {
    async fn next_tick(&mut self) -> Option<DateTime<Local>> {
        let now = Local::now();
        if let Some(last) = self.last_tick {
            let missed = self.schedule.count_between(&last, &now) as u64;
            if missed > 0 {
                self.skipped_ticks += missed;
                tracing::warn!(
                    skipped_ticks = missed,
                    total_skipped = self.skipped_ticks,
                    "cycle overran its schedule; missed ticks were skipped"
                );
            }
        }

        let next = self.schedule.next_after(&now)?;
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;
        self.last_tick = Some(next);
        Some(next)
    }
}
