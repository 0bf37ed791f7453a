//! Testing utilities for users of the scheduler.
//!
//! This module provides helpers for testing code built on [`Scheduler`]:
//!
//! - [`sum`] and [`multiply`]: simple integer work functions
//! - [`sleepy`] and [`panicker`]: thunks that block or panic on demand
//! - [`ConcurrencyProbe`]: measures how many jobs run at once
//! - [`RecordingHandler`]: an event handler that keeps every event
//!
//! [`Scheduler`]: crate::Scheduler

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::core::result::JobError;
use crate::events::{Event, EventHandler};

/// Sum of all arguments.
pub fn sum(args: &[i64]) -> i64 {
    args.iter().sum()
}

/// Product of all arguments. The empty product is 1.
pub fn multiply(args: &[i64]) -> i64 {
    args.iter().product()
}

/// A thunk that blocks its thread for `delay`, then returns `value`.
pub fn sleepy<T: Send + 'static>(delay: Duration, value: T) -> impl FnOnce() -> T + Send + 'static {
    move || {
        thread::sleep(delay);
        value
    }
}

/// A thunk that panics with `message`.
pub fn panicker<T: 'static>(message: &'static str) -> impl FnOnce() -> T + Send + 'static {
    move || -> T { panic!("{}", message) }
}

/// Tracks the number of jobs executing at the same time.
///
/// # Example
///
/// ```
/// use petit_pool::testing::ConcurrencyProbe;
///
/// let probe = ConcurrencyProbe::new();
/// {
///     let _a = probe.enter();
///     let _b = probe.enter();
///     assert_eq!(probe.current(), 2);
/// }
/// assert_eq!(probe.current(), 0);
/// assert_eq!(probe.peak(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl ConcurrencyProbe {
    /// Create a probe with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one job as running until the guard is dropped.
    pub fn enter(&self) -> ProbeGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        ProbeGuard {
            current: Arc::clone(&self.current),
        }
    }

    /// Jobs running right now.
    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// Highest number of jobs seen running at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of times `enter` was called.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

/// Returned by [`ConcurrencyProbe::enter`].
pub struct ProbeGuard {
    current: Arc<AtomicUsize>,
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Event handler that records every event it receives.
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    /// Create an empty recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All events received so far.
    pub async fn events(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }

    /// Number of `JobStarted` events.
    pub async fn jobs_started(&self) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| matches!(e, Event::JobStarted { .. }))
            .count()
    }

    /// Errors from `JobFailed` events, keyed by job index.
    pub async fn failures(&self) -> Vec<(usize, JobError)> {
        let mut failures: Vec<(usize, JobError)> = self
            .events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                Event::JobFailed { index, error, .. } => Some((*index, error.clone())),
                _ => None,
            })
            .collect();
        failures.sort_by_key(|(index, _)| *index);
        failures
    }

    /// Distinct worker ids that picked up jobs.
    pub async fn workers_used(&self) -> Vec<usize> {
        let mut workers: Vec<usize> = self
            .events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                Event::JobStarted { worker, .. } => Some(*worker),
                _ => None,
            })
            .collect();
        workers.sort_unstable();
        workers.dedup();
        workers
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &Event) {
        self.events.lock().await.push(event.clone());
    }
}
