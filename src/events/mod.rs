//! Lifecycle events and event handling.
//!
//! This module provides event emission for run and job lifecycle events,
//! giving callers visibility into a run without touching the results.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::trace;

use crate::core::result::JobError;
use crate::core::types::RunId;

/// Lifecycle events emitted during a run.
#[derive(Debug, Clone)]
pub enum Event {
    /// A run has taken its snapshot and is starting workers.
    RunStarted {
        run_id: RunId,
        job_count: usize,
        workers: usize,
        timestamp: Instant,
    },

    /// A worker picked up a job.
    JobStarted {
        run_id: RunId,
        /// Submission index of the job.
        index: usize,
        /// Worker that is executing the job (0-based).
        worker: usize,
        timestamp: Instant,
    },

    /// A job produced a value.
    JobCompleted {
        run_id: RunId,
        index: usize,
        duration: Duration,
        timestamp: Instant,
    },

    /// A job timed out or panicked.
    JobFailed {
        run_id: RunId,
        index: usize,
        error: JobError,
        duration: Duration,
        timestamp: Instant,
    },

    /// All results are collected and every worker has exited.
    RunCompleted {
        run_id: RunId,
        job_count: usize,
        /// Number of jobs that ended with an error.
        failed: usize,
        duration: Duration,
        timestamp: Instant,
    },
}

impl Event {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> Instant {
        match self {
            Event::RunStarted { timestamp, .. } => *timestamp,
            Event::JobStarted { timestamp, .. } => *timestamp,
            Event::JobCompleted { timestamp, .. } => *timestamp,
            Event::JobFailed { timestamp, .. } => *timestamp,
            Event::RunCompleted { timestamp, .. } => *timestamp,
        }
    }

    /// Get the run this event belongs to.
    pub fn run_id(&self) -> RunId {
        match self {
            Event::RunStarted { run_id, .. }
            | Event::JobStarted { run_id, .. }
            | Event::JobCompleted { run_id, .. }
            | Event::JobFailed { run_id, .. }
            | Event::RunCompleted { run_id, .. } => *run_id,
        }
    }

    /// Create a RunStarted event.
    pub fn run_started(run_id: RunId, job_count: usize, workers: usize) -> Self {
        Event::RunStarted {
            run_id,
            job_count,
            workers,
            timestamp: Instant::now(),
        }
    }

    /// Create a JobStarted event.
    pub fn job_started(run_id: RunId, index: usize, worker: usize) -> Self {
        Event::JobStarted {
            run_id,
            index,
            worker,
            timestamp: Instant::now(),
        }
    }

    /// Create a JobCompleted event.
    pub fn job_completed(run_id: RunId, index: usize, duration: Duration) -> Self {
        Event::JobCompleted {
            run_id,
            index,
            duration,
            timestamp: Instant::now(),
        }
    }

    /// Create a JobFailed event.
    pub fn job_failed(run_id: RunId, index: usize, error: JobError, duration: Duration) -> Self {
        Event::JobFailed {
            run_id,
            index,
            error,
            duration,
            timestamp: Instant::now(),
        }
    }

    /// Create a RunCompleted event.
    pub fn run_completed(
        run_id: RunId,
        job_count: usize,
        failed: usize,
        duration: Duration,
    ) -> Self {
        Event::RunCompleted {
            run_id,
            job_count,
            failed,
            duration,
            timestamp: Instant::now(),
        }
    }
}

/// Handler for receiving lifecycle events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: &Event);
}

/// Fans run and job events out to every registered handler.
///
/// Handlers are called in registration order, one at a time, on the task
/// that emitted the event. A scheduler shares one bus across all its runs.
pub struct EventBus {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    /// Create a bus with no handlers attached.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Attach `handler` to receive every later event.
    pub async fn register(&self, handler: Arc<dyn EventHandler>) {
        self.handlers.write().await.push(handler);
    }

    /// Deliver `event` to each handler in turn.
    pub async fn emit(&self, event: Event) {
        let handlers = self.handlers.read().await;
        if handlers.is_empty() {
            return;
        }
        trace!(run = %event.run_id(), handlers = handlers.len(), "emitting event");
        for handler in handlers.iter() {
            handler.handle(&event).await;
        }
    }

    /// Number of attached handlers.
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
