//! Sources for the default worker count.
//!
//! A scheduler built with `max_workers == 0` asks a [`ParallelismProvider`]
//! once, at construction, how many workers to start.

use std::num::NonZeroUsize;
use std::thread;
use tracing::warn;

/// Upper bound on workers per run. Larger requests are clamped.
pub const MAX_WORKERS_LIMIT: usize = 4096;

/// Reports how many hardware execution units are available.
pub trait ParallelismProvider {
    /// Number of units available. Must be at least one.
    fn available(&self) -> NonZeroUsize;
}

/// Queries the operating system via `std::thread::available_parallelism`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemParallelism;

impl ParallelismProvider for SystemParallelism {
    fn available(&self) -> NonZeroUsize {
        thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
    }
}

/// Always reports the same count. Useful in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedParallelism(NonZeroUsize);

impl FixedParallelism {
    /// Create a provider reporting `count` units. Zero is raised to one.
    pub fn new(count: usize) -> Self {
        Self(NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN))
    }
}

impl ParallelismProvider for FixedParallelism {
    fn available(&self) -> NonZeroUsize {
        self.0
    }
}

/// Resolve a requested worker count, treating zero as "ask the provider".
///
/// The result is always in `1..=MAX_WORKERS_LIMIT`.
pub fn resolve_workers(requested: usize, provider: &dyn ParallelismProvider) -> usize {
    let workers = if requested == 0 {
        provider.available().get()
    } else {
        requested
    };
    if workers > MAX_WORKERS_LIMIT {
        warn!(requested = workers, limit = MAX_WORKERS_LIMIT, "clamping worker count");
    }
    workers.min(MAX_WORKERS_LIMIT)
}
