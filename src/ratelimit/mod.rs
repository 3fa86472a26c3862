//! Fixed-window rate limiting for public form submissions.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Windows kept before idle ones are swept.
const SWEEP_THRESHOLD: usize = 1024;

/// Submission counter for one client.
///
/// The window opens with the first submission and lasts `window`; once it has
/// elapsed the next submission opens a fresh window.
#[derive(Debug, Clone)]
pub struct FixedWindow {
    limit: u32,
    window: Duration,
    count: u32,
    started: Option<Instant>,
}

impl FixedWindow {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            count: 0,
            started: None,
        }
    }

    /// Count a submission at `now`. Returns false when the limit is reached.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let expired = self
            .started
            .map_or(true, |start| now.saturating_duration_since(start) >= self.window);
        if expired {
            self.count = 0;
            self.started = Some(now);
        }

        if self.count >= self.limit {
            return false;
        }
        self.count += 1;
        true
    }

    /// Time until the current window closes.
    pub fn retry_after(&self, now: Instant) -> Duration {
        self.started
            .map(|start| self.window.saturating_sub(now.saturating_duration_since(start)))
            .unwrap_or_default()
    }

    fn is_idle(&self, now: Instant) -> bool {
        self.started
            .map_or(true, |start| now.saturating_duration_since(start) >= self.window)
    }
}

/// One fixed window per client key.
#[derive(Debug)]
pub struct RateLimiter<K> {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<K, FixedWindow>>,
}

impl<K: Eq + Hash> RateLimiter<K> {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count a submission for `key` now; on rejection returns the retry delay.
    pub fn check(&self, key: K) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: K, now: Instant) -> Result<(), Duration> {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, w| !w.is_idle(now));
        }

        let window = windows
            .entry(key)
            .or_insert_with(|| FixedWindow::new(self.limit, self.window));

        if window.try_acquire(now) {
            Ok(())
        } else {
            Err(window.retry_after(now))
        }
    }
}
