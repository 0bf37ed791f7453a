//! Queued units of work.
//!
//! A [`Job`] owns a boxed thunk that produces the job's value. Work
//! registered with integer arguments is captured into a thunk at
//! registration time, so nothing runs until the scheduler dispatches it.

use std::fmt;

/// A deferred computation producing a `T`.
pub type Thunk<T> = Box<dyn FnOnce() -> T + Send + 'static>;

/// A queued unit of work awaiting execution.
pub struct Job<T> {
    work: Thunk<T>,
    arity: Option<usize>,
}

impl<T> Job<T> {
    /// Create a job from a zero-argument closure.
    pub fn from_thunk<F>(thunk: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            work: Box::new(thunk),
            arity: None,
        }
    }

    /// Create a job that calls `work` with `args` when executed.
    pub fn with_args<F>(work: F, args: Vec<i64>) -> Self
    where
        F: FnOnce(&[i64]) -> T + Send + 'static,
    {
        let arity = args.len();
        Self {
            work: Box::new(move || work(&args)),
            arity: Some(arity),
        }
    }

    /// Number of integer arguments, if the job was registered with any.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Consume the job and run its work on the current thread.
    pub fn run(self) -> T {
        (self.work)()
    }

    pub(crate) fn into_thunk(self) -> Thunk<T> {
        self.work
    }
}

impl<T> fmt::Debug for Job<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("arity", &self.arity).finish()
    }
}
