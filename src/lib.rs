pub mod config;
pub mod core;
pub mod events;
pub mod execution;
pub mod scheduler;
pub mod testing;

pub use config::{ConfigError, SchedulerConfig, YamlLoader};
pub use crate::core::job::{Job, Thunk};
pub use crate::core::parallelism::{FixedParallelism, ParallelismProvider, SystemParallelism};
pub use crate::core::queue::JobQueue;
pub use crate::core::result::{JobError, JobResult};
pub use crate::core::types::RunId;
pub use events::{Event, EventBus, EventHandler};
pub use execution::{WorkerGauge, execute_job};
pub use scheduler::Scheduler;
