//! Per-job results and the errors a job can end with.
//!
//! Job failures never escape a run. Each one lands in the failing job's
//! slot as a [`JobResult`] carrying a [`JobError`], with the value left at
//! its default.

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// Errors that can end a single job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// The job did not finish within the scheduler's timeout.
    #[error("job timed out after {0:?}")]
    Timeout(Duration),

    /// The job's work function panicked.
    #[error("Panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Build a `Panicked` error from a panic payload.
    ///
    /// Payloads raised with `panic!("literal")` are `&'static str`, formatted
    /// panics carry a `String`. Anything else is reported generically.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "unknown panic payload".to_string(),
            },
        };
        JobError::Panicked(message)
    }

    /// Whether this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, JobError::Timeout(_))
    }

    /// Whether this error is a recovered panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, JobError::Panicked(_))
    }
}

/// Outcome of one job, stored at the job's submission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult<T = i64> {
    /// Value produced by the job, or `T::default()` if it failed.
    pub value: T,
    /// Set when the job timed out or panicked.
    pub error: Option<JobError>,
}

impl<T> JobResult<T> {
    /// Create a successful result.
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    /// Whether the job produced a value.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, JobError> {
        match self.error {
            None => Ok(self.value),
            Some(err) => Err(err),
        }
    }
}

impl<T: Default> JobResult<T> {
    /// Create a failed result with a default value.
    pub fn failed(error: JobError) -> Self {
        Self {
            value: T::default(),
            error: Some(error),
        }
    }
}
