//! Job execution engine.
//!
//! This module provides the per-job timeout race and the worker loop that
//! feeds jobs into it.

mod executor;
pub(crate) mod worker;

pub use executor::execute_job;
pub use worker::WorkerGauge;
