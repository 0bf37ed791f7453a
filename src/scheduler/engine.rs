//! Bounded worker-pool scheduler.
//!
//! Jobs are registered with [`Scheduler::add`] or [`Scheduler::add_thunk`]
//! and execute only when [`Scheduler::run`] is awaited. Each run:
//!
//! 1. Drains the queue into a snapshot so later `add` calls start a new batch
//! 2. Spawns exactly `max_workers` workers sharing one dispatch channel
//! 3. Feeds the snapshot into the dispatch channel (capacity `max_workers`)
//! 4. Collects one completion per job and places it at the job's index
//! 5. Closes the dispatch channel and waits for every worker to exit
//!
//! Timeouts and panics are recorded in the failing job's slot. They never
//! abort the run.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info_span};

use crate::config::SchedulerConfig;
use crate::core::job::Job;
use crate::core::parallelism::{ParallelismProvider, SystemParallelism, resolve_workers};
use crate::core::queue::JobQueue;
use crate::core::result::{JobError, JobResult};
use crate::core::types::RunId;
use crate::events::{Event, EventBus};
use crate::execution::WorkerGauge;
use crate::execution::worker::{Completion, Dispatch, WorkerContext, run_worker};

/// Reported for a slot whose job never came back from a worker.
const WORKER_LOST: &str = "worker exited before reporting";

/// Runs batches of jobs on a fixed-size worker pool.
///
/// `T` is the value each job produces. It defaults to `i64`.
pub struct Scheduler<T = i64> {
    max_workers: usize,
    timeout: Option<Duration>,
    queue: JobQueue<T>,
    event_bus: Option<Arc<EventBus>>,
    gauge: WorkerGauge,
}

impl<T> Scheduler<T>
where
    T: Default + Send + 'static,
{
    /// Create a scheduler.
    ///
    /// `max_workers == 0` means one worker per available CPU, resolved now.
    /// A zero `timeout` disables the per-job timeout.
    pub fn new(max_workers: usize, timeout: Duration) -> Self {
        Self::with_parallelism(max_workers, timeout, &SystemParallelism)
    }

    /// Create a scheduler that resolves `max_workers == 0` through `provider`.
    pub fn with_parallelism(
        max_workers: usize,
        timeout: Duration,
        provider: &dyn ParallelismProvider,
    ) -> Self {
        let timeout = (!timeout.is_zero()).then_some(timeout);
        Self::build(resolve_workers(max_workers, provider), timeout)
    }

    /// Create a scheduler from loaded configuration.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::build(
            resolve_workers(config.max_workers, &SystemParallelism),
            config.timeout(),
        )
    }

    fn build(max_workers: usize, timeout: Option<Duration>) -> Self {
        Self {
            max_workers,
            timeout,
            queue: JobQueue::new(),
            event_bus: None,
            gauge: WorkerGauge::new(),
        }
    }

    /// Emit lifecycle events to `bus` during runs.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Number of workers started per run.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Per-job timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Number of jobs waiting for the next run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Handle on the live-worker counter.
    pub fn worker_gauge(&self) -> WorkerGauge {
        self.gauge.clone()
    }

    /// Number of worker tasks currently alive. Zero outside of `run`.
    pub fn live_workers(&self) -> usize {
        self.gauge.live()
    }

    /// Queue `work` to be called with `args` on the next run.
    pub fn add<F>(&mut self, work: F, args: impl Into<Vec<i64>>)
    where
        F: FnOnce(&[i64]) -> T + Send + 'static,
    {
        self.queue.push(Job::with_args(work, args.into()));
    }

    /// Queue a zero-argument closure to be called on the next run.
    pub fn add_thunk<F>(&mut self, thunk: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.queue.push(Job::from_thunk(thunk));
    }

    /// Execute every queued job and return the results in submission order.
    ///
    /// The queue is empty afterwards. All workers have exited by the time
    /// this returns, though sub-tasks of timed-out jobs may still be running.
    pub async fn run(&mut self) -> Vec<JobResult<T>> {
        let jobs = self.queue.drain();
        let run_id = RunId::new();

        let span = info_span!(
            "scheduler_run",
            run = %run_id,
            jobs = jobs.len(),
            workers = self.max_workers,
        );

        let pool = PoolSettings {
            max_workers: self.max_workers,
            timeout: self.timeout,
            event_bus: self.event_bus.clone(),
            gauge: self.gauge.clone(),
        };

        pool.run_batch(run_id, jobs).instrument(span).await
    }
}

/// Per-run copy of the scheduler settings.
///
/// Holds no queued thunks, which are not `Sync`; the run future must stay `Send`.
struct PoolSettings {
    max_workers: usize,
    timeout: Option<Duration>,
    event_bus: Option<Arc<EventBus>>,
    gauge: WorkerGauge,
}

impl PoolSettings {
    async fn run_batch<T>(self, run_id: RunId, jobs: Vec<Job<T>>) -> Vec<JobResult<T>>
    where
        T: Default + Send + 'static,
    {
        let total = jobs.len();
        let start = Instant::now();

        debug!(run = %run_id, total, workers = self.max_workers, "starting run");

        if let Some(ref bus) = self.event_bus {
            bus.emit(Event::run_started(run_id, total, self.max_workers)).await;
        }

        let (dispatch_tx, dispatch_rx) = mpsc::channel::<Dispatch<T>>(self.max_workers);
        let dispatch_rx = Arc::new(Mutex::new(dispatch_rx));
        let (completion_tx, mut completion_rx) = mpsc::channel::<Completion<T>>(total.max(1));

        let ctx = Arc::new(WorkerContext {
            run_id,
            timeout: self.timeout,
            event_bus: self.event_bus.clone(),
        });

        let mut workers = JoinSet::new();
        for worker in 0..self.max_workers {
            let guard = self.gauge.enter();
            workers.spawn(
                run_worker(
                    worker,
                    Arc::clone(&dispatch_rx),
                    completion_tx.clone(),
                    Arc::clone(&ctx),
                    guard,
                )
                .in_current_span(),
            );
        }
        // Workers hold the only senders, so the channel closes if they all die.
        drop(completion_tx);
        drop(dispatch_rx);

        for (index, job) in jobs.into_iter().enumerate() {
            if dispatch_tx.send(Dispatch { index, job }).await.is_err() {
                error!(run = %run_id, index, "no workers left to accept jobs");
                break;
            }
        }

        let mut dispatch_tx = Some(dispatch_tx);
        let mut slots: Vec<Option<JobResult<T>>> = (0..total).map(|_| None).collect();
        let mut received = 0;
        while received < total {
            tokio::select! {
                completion = completion_rx.recv() => match completion {
                    Some(Completion { index, result }) => {
                        slots[index] = Some(result);
                        received += 1;
                    }
                    None => {
                        error!(
                            run = %run_id,
                            received,
                            total,
                            "completion channel closed early"
                        );
                        break;
                    }
                },
                Some(joined) = workers.join_next(), if dispatch_tx.is_some() => {
                    if let Err(err) = joined {
                        error!(run = %run_id, error = %err, "worker died mid-run");
                    }
                    // Survivors drain what is queued, then exit and close the completion channel.
                    dispatch_tx = None;
                }
            }
        }

        drop(dispatch_tx);
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                error!(run = %run_id, error = %err, "worker task failed");
            }
        }

        let results: Vec<JobResult<T>> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    JobResult::failed(JobError::Panicked(WORKER_LOST.to_string()))
                })
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        let duration = start.elapsed();

        debug!(
            run = %run_id,
            total,
            failed,
            duration_ms = %duration.as_millis(),
            "run completed"
        );

        if let Some(ref bus) = self.event_bus {
            bus.emit(Event::run_completed(run_id, total, failed, duration)).await;
        }

        results
    }
}
