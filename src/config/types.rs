//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use crate::core::parallelism::MAX_WORKERS_LIMIT;

/// Scheduler settings.
///
/// ```yaml
/// max_workers: 4     # 0 or omitted: one worker per available CPU
/// timeout_ms: 1000   # 0 or omitted: no timeout
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of workers per run.
    pub max_workers: usize,
    /// Per-job timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl SchedulerConfig {
    /// Per-job timeout. Zero maps to no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
