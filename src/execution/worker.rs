//! Pool workers and the live-worker gauge.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, info_span};

use crate::core::job::Job;
use crate::core::result::JobResult;
use crate::core::types::RunId;
use crate::events::{Event, EventBus};

use super::executor::execute_job;

/// A job handed to a worker, tagged with its submission index.
pub(crate) struct Dispatch<T> {
    pub index: usize,
    pub job: Job<T>,
}

/// A finished job on its way back to the collecting run loop.
pub(crate) struct Completion<T> {
    pub index: usize,
    pub result: JobResult<T>,
}

/// Receiving end of the dispatch channel, shared by every worker in a run.
pub(crate) type SharedDispatch<T> = Arc<Mutex<mpsc::Receiver<Dispatch<T>>>>;

/// Settings every worker in a run shares.
pub(crate) struct WorkerContext {
    pub run_id: RunId,
    pub timeout: Option<Duration>,
    pub event_bus: Option<Arc<EventBus>>,
}

/// Counts worker tasks that are currently alive.
///
/// Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct WorkerGauge {
    live: Arc<AtomicUsize>,
}

impl WorkerGauge {
    /// Create a gauge reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live workers.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Count one worker until the returned guard is dropped.
    pub(crate) fn enter(&self) -> WorkerGuard {
        self.live.fetch_add(1, Ordering::SeqCst);
        WorkerGuard {
            live: Arc::clone(&self.live),
        }
    }
}

/// Decrements the gauge when a worker's future is dropped.
pub(crate) struct WorkerGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Pull jobs until the dispatch channel is closed and drained.
pub(crate) async fn run_worker<T>(
    worker: usize,
    dispatch: SharedDispatch<T>,
    completions: mpsc::Sender<Completion<T>>,
    ctx: Arc<WorkerContext>,
    guard: WorkerGuard,
) where
    T: Default + Send + 'static,
{
    let _guard = guard;
    debug!(worker, "worker started");

    loop {
        let next = dispatch.lock().await.recv().await;
        let Some(Dispatch { index, job }) = next else {
            break;
        };

        let span = info_span!("job", run = %ctx.run_id, index, worker);
        let result = process(worker, index, job, &ctx).instrument(span).await;

        if completions.send(Completion { index, result }).await.is_err() {
            debug!(worker, "completion channel closed");
            break;
        }
    }

    debug!(worker, "worker exiting");
}

async fn process<T>(worker: usize, index: usize, job: Job<T>, ctx: &WorkerContext) -> JobResult<T>
where
    T: Default + Send + 'static,
{
    if let Some(ref bus) = ctx.event_bus {
        bus.emit(Event::job_started(ctx.run_id, index, worker)).await;
    }

    let start = Instant::now();
    let result = execute_job(job, ctx.timeout).await;
    let duration = start.elapsed();

    debug!(
        ok = result.is_ok(),
        duration_ms = %duration.as_millis(),
        "job finished"
    );

    if let Some(ref bus) = ctx.event_bus {
        let event = match &result.error {
            None => Event::job_completed(ctx.run_id, index, duration),
            Some(err) => Event::job_failed(ctx.run_id, index, err.clone(), duration),
        };
        bus.emit(event).await;
    }

    result
}
