//! Ordered buffer of jobs waiting for the next run.

use super::job::Job;

/// Append-only job buffer. Insertion order is submission order.
#[derive(Debug)]
pub struct JobQueue<T> {
    jobs: Vec<Job<T>>,
}

impl<T> JobQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Append a job.
    pub fn push(&mut self, job: Job<T>) {
        self.jobs.push(job);
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Take every queued job, leaving the queue empty for the next batch.
    pub fn drain(&mut self) -> Vec<Job<T>> {
        std::mem::take(&mut self.jobs)
    }
}

impl<T> Default for JobQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
