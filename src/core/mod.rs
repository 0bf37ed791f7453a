//! Core data types: jobs, the job queue, results, and identifiers.

pub mod job;
pub mod parallelism;
pub mod queue;
pub mod result;
pub mod types;
