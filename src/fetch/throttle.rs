//! Politeness throttle for uncached requests
//!
//! The gate remembers when the last uncached request finished. A new
//! uncached request waits until a full interval has passed since then, and
//! holds the gate until its own request finishes, so at most one uncached
//! request is in flight per process.

use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// "Time of last miss" gate
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_miss: Mutex<Option<Instant>>,
}

/// Exclusive right to perform one uncached request
///
/// Call [`ThrottlePermit::begin`] right before the network call and
/// [`ThrottlePermit::complete`] once it has finished. A permit dropped
/// after `begin` still starts a new interval, even when the request was
/// cancelled midway. One dropped before `begin` releases the gate without
/// starting an interval (e.g. when the cache was filled meanwhile).
pub struct ThrottlePermit<'a> {
    guard: MutexGuard<'a, Option<Instant>>,
    started: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_miss: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the gate and for the interval to elapse
    pub async fn acquire(&self) -> ThrottlePermit<'_> {
        let guard = self.last_miss.lock().await;

        if let Some(wait) = remaining(*guard, self.interval, Instant::now()) {
            tracing::trace!("Throttling next request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }

        ThrottlePermit {
            guard,
            started: false,
        }
    }

    /// Time left before an uncached request may start, if any
    pub async fn time_until_ready(&self) -> Option<Duration> {
        let last = *self.last_miss.lock().await;
        remaining(last, self.interval, Instant::now())
    }
}

impl ThrottlePermit<'_> {
    /// Marks the request as sent
    pub fn begin(&mut self) {
        self.started = true;
    }

    /// Records that the request finished now and releases the gate
    pub fn complete(mut self) {
        self.started = true;
    }
}

impl Drop for ThrottlePermit<'_> {
    fn drop(&mut self) {
        if self.started {
            *self.guard = Some(Instant::now());
        }
    }
}

fn remaining(last: Option<Instant>, interval: Duration, now: Instant) -> Option<Duration> {
    let last = last?;
    let elapsed = now.saturating_duration_since(last);
    if elapsed < interval {
        Some(interval - elapsed)
    } else {
        None
    }
}
