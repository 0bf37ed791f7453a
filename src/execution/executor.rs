//! Single-job execution.
//!
//! [`execute_job`] runs one job under a timeout race:
//! - The work runs on tokio's blocking pool, so a panic unwinds there and
//!   comes back as a `JoinError` instead of taking the caller down
//! - The join handle is raced against the timeout; whichever finishes first
//!   decides the result
//! - On timeout the blocking sub-task is detached, not killed. It may keep
//!   running but whatever it returns is dropped

use std::time::Duration;
use tokio::task;
use tokio::time;
use tracing::{debug, warn};

use crate::core::job::Job;
use crate::core::result::{JobError, JobResult};

/// Run `job` to completion, a panic, or the timeout, whichever comes first.
///
/// `None` disables the timeout.
pub async fn execute_job<T>(job: Job<T>, timeout: Option<Duration>) -> JobResult<T>
where
    T: Default + Send + 'static,
{
    let handle = task::spawn_blocking(job.into_thunk());

    let joined = match timeout {
        Some(limit) => match time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(timeout_ms = %limit.as_millis(), "job timed out, detaching its sub-task");
                return JobResult::failed(JobError::Timeout(limit));
            }
        },
        None => handle.await,
    };

    match joined {
        Ok(value) => JobResult::ok(value),
        Err(err) if err.is_panic() => {
            let error = JobError::from_panic(err.into_panic());
            warn!(error = %error, "job panicked");
            JobResult::failed(error)
        }
        // Only reachable while the runtime is shutting down.
        Err(err) => {
            debug!(error = %err, "job sub-task was cancelled");
            JobResult::failed(JobError::Panicked(err.to_string()))
        }
    }
}
