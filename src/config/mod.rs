//! Configuration models for queues and worker pools.

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;

/// Synchronized queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Storage backend selection.
    pub backend: BackendKind,
    /// Maximum number of tasks held at once.
    pub capacity: usize,
}

impl QueueConfig {
    /// A queue config over the given backend and capacity.
    #[must_use]
    pub const fn new(backend: BackendKind, capacity: usize) -> Self {
        Self { backend, capacity }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        Ok(())
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Stack size per worker thread in bytes, when overridden.
    pub thread_stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            thread_stack_size: None,
        }
    }
}

impl PoolConfig {
    /// A pool config with one worker per available CPU.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the worker count.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Overrides the per-worker stack size in bytes.
    #[must_use]
    pub const fn with_thread_stack_size(mut self, bytes: usize) -> Self {
        self.thread_stack_size = Some(bytes);
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        Ok(())
    }
}

/// Root configuration tying one queue to one pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkConfig {
    /// Queue settings.
    pub queue: QueueConfig,
    /// Pool settings.
    pub pool: PoolConfig,
}

impl WorkConfig {
    /// Validate the queue and pool sections.
    ///
    /// # Errors
    ///
    /// A message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        self.queue
            .validate()
            .map_err(|e| format!("queue invalid: {e}"))?;
        self.pool
            .validate()
            .map_err(|e| format!("pool invalid: {e}"))
    }

    /// Parse a configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// A parse error or the first validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
