//! High-level runtime engine settings
//!
//! Selects the update rule, the worker pool size and the tick timing
//! used when building and running a `Pipeline`

use std::sync::Arc;
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::simulation::rules::RuleKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub rule: RuleKind,                    // kinematic or gravitational
    pub threads: usize,                    // worker pool size, >= 1
    pub tick_interval: Duration,           // scheduler period
    pub worker_timeout: Option<Duration>,  // bound on the per-tick wait, None = wait forever
}

impl Engine {
    /// Build the worker pool the pipeline fans out onto
    pub fn build_pool(&self) -> Result<Arc<ThreadPool>, ThreadPoolBuildError> {
        build_pool(self.threads)
    }
}

/// Worker pool with `threads` named workers
pub fn build_pool(threads: usize) -> Result<Arc<ThreadPool>, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("sim-worker-{i}"))
        .build()
        .map(Arc::new)
}

/// Number of logical CPUs visible to this process
pub fn hw_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
