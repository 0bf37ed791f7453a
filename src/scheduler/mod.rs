//! Scheduler that runs batches of queued jobs on a bounded worker pool.

mod engine;

pub use engine::Scheduler;
