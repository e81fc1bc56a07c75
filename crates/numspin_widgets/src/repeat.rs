//! Press-and-hold auto-repeat
//!
//! [`AutoRepeat`] owns at most one worker thread at a time. The worker waits
//! an initial delay, then invokes its callback at a fixed interval until the
//! [`CancelToken`] it was started with is cancelled. Both waits are
//! interruptible, so a release is observed immediately rather than after
//! the current interval elapses.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

/// Callback invoked on every repeat tick (runs on the worker thread)
pub type RepeatCallback = Arc<dyn Fn() + Send + Sync>;

/// Auto-repeat timing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    /// Delay between press and the first tick (ms)
    pub initial_delay_ms: u64,
    /// Delay between subsequent ticks (ms)
    pub interval_ms: u64,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 400,
            interval_ms: 70,
        }
    }
}

impl RepeatConfig {
    pub fn new(initial_delay_ms: u64, interval_ms: u64) -> Self {
        Self {
            initial_delay_ms,
            interval_ms,
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

struct TokenInner {
    cancelled: Mutex<bool>,
    cond: Condvar,
}

/// One-shot cancellation signal shared between a button and its worker
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: Mutex::new(false),
                cond: Condvar::new(),
            }),
        }
    }

    /// Cancel and wake any waiter; cancelling twice is a no-op
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        if !*cancelled {
            *cancelled = true;
            self.inner.cond.notify_all();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Block for up to `timeout`; returns true if cancelled
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            if self
                .inner
                .cond
                .wait_until(&mut cancelled, deadline)
                .timed_out()
            {
                break;
            }
        }
        *cancelled
    }
}

struct RepeatWorker {
    token: CancelToken,
    ticks: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

/// Drives a callback while a button is held
pub struct AutoRepeat {
    config: RepeatConfig,
    worker: Option<RepeatWorker>,
}

impl AutoRepeat {
    pub fn new(config: RepeatConfig) -> Self {
        Self {
            config,
            worker: None,
        }
    }

    pub fn config(&self) -> RepeatConfig {
        self.config
    }

    /// Whether a worker is currently armed
    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    /// Ticks fired so far by the armed worker
    pub fn ticks(&self) -> usize {
        self.worker
            .as_ref()
            .map(|w| w.ticks.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Arm the worker
    ///
    /// Returns false if a worker is already armed (the call is ignored) or
    /// the thread could not be spawned.
    pub fn start(&mut self, callback: RepeatCallback) -> bool {
        if self.worker.is_some() {
            return false;
        }

        let token = CancelToken::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let config = self.config;

        let worker_token = token.clone();
        let worker_ticks = Arc::clone(&ticks);
        let spawned = thread::Builder::new()
            .name("numspin-repeat".into())
            .spawn(move || {
                if worker_token.wait(config.initial_delay()) {
                    return;
                }
                loop {
                    if worker_token.is_cancelled() {
                        break;
                    }
                    callback();
                    let n = worker_ticks.fetch_add(1, Ordering::AcqRel) + 1;
                    tracing::trace!(tick = n, "auto-repeat tick");
                    if worker_token.wait(config.interval()) {
                        break;
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                tracing::debug!(
                    initial_delay_ms = config.initial_delay_ms,
                    interval_ms = config.interval_ms,
                    "auto-repeat armed"
                );
                self.worker = Some(RepeatWorker {
                    token,
                    ticks,
                    handle,
                });
                true
            }
            Err(err) => {
                tracing::warn!("auto-repeat: failed to spawn worker: {}", err);
                false
            }
        }
    }

    /// Cancel and join the worker
    ///
    /// Returns the number of ticks it fired, or `None` if nothing was armed.
    pub fn stop(&mut self) -> Option<usize> {
        let worker = self.worker.take()?;
        worker.token.cancel();
        if worker.handle.join().is_err() {
            tracing::warn!("auto-repeat: worker panicked in tick callback");
        }
        let ticks = worker.ticks.load(Ordering::Acquire);
        tracing::debug!(ticks, "auto-repeat stopped");
        Some(ticks)
    }
}

impl Drop for AutoRepeat {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Arc<AtomicUsize>, RepeatCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (
            count,
            Arc::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_token_wait_times_out() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert!(!token.wait(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_token_cancel_wakes_waiter() {
        let token = CancelToken::new();
        let t = token.clone();
        let waiter = thread::spawn(move || t.wait(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(20));
        token.cancel();
        assert!(waiter.join().unwrap());
        assert!(token.is_cancelled());
        // Already cancelled: returns immediately
        assert!(token.wait(Duration::from_secs(10)));
    }

    #[test]
    fn test_release_before_initial_delay_never_ticks() {
        let (count, cb) = counter();
        let mut repeat = AutoRepeat::new(RepeatConfig::default());

        assert!(repeat.start(cb));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(repeat.stop(), Some(0));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!repeat.is_active());
    }

    #[test]
    fn test_hold_500ms_ticks_at_least_twice() {
        let (count, cb) = counter();
        let mut repeat = AutoRepeat::new(RepeatConfig::default());

        repeat.start(cb);
        thread::sleep(Duration::from_millis(500));
        let ticks = repeat.stop().unwrap();

        assert!(ticks >= 2, "expected at least 2 ticks, got {}", ticks);
        assert_eq!(count.load(Ordering::SeqCst), ticks);
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let (count, cb) = counter();
        let mut repeat = AutoRepeat::new(RepeatConfig::new(5, 5));

        repeat.start(cb);
        thread::sleep(Duration::from_millis(40));
        let ticks = repeat.stop().unwrap();
        thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), ticks);
    }

    #[test]
    fn test_at_most_one_worker() {
        let (count, cb) = counter();
        let mut repeat = AutoRepeat::new(RepeatConfig::new(10, 10));

        assert!(repeat.start(cb.clone()));
        assert!(!repeat.start(cb.clone()));
        thread::sleep(Duration::from_millis(35));
        let ticks = repeat.stop().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), ticks);

        // Stopping again is a no-op; restarting works
        assert_eq!(repeat.stop(), None);
        assert!(repeat.start(cb));
        assert!(repeat.is_active());
    }
}
