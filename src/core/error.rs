//! Error taxonomy shared by the queue and the worker pool.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors produced by queue and pool operations.
///
/// [`Full`](QueueError::Full) and [`Empty`](QueueError::Empty) on
/// non-blocking calls are ordinary, recoverable outcomes that callers are
/// expected to handle. The remaining kinds indicate resource exhaustion,
/// cancellation, or misuse; the crate surfaces them and takes no recovery
/// action of its own. No operation in the core panics or aborts the process.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue already holds `capacity` tasks; the push was rejected.
    #[error("the task queue is full")]
    Full,

    /// The queue holds no tasks and the caller declined to wait.
    #[error("the task queue is empty")]
    Empty,

    /// A non-blocking operation found the queue lock held by another thread.
    #[error("queue lock is held by another thread")]
    LockUnavailable,

    /// A blocking wait was interrupted by cancellation before a task arrived.
    #[error("blocking wait was cancelled")]
    Cancelled,

    /// Backend storage could not be allocated or grown. Existing storage is
    /// untouched and remains usable.
    #[error("storage allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// One or more worker threads could not be spawned.
    ///
    /// Partial starts are permitted: `started` workers are running despite
    /// the error. Per-worker reason codes are retained in the pool's
    /// startup-error slots.
    #[error("failed to spawn {failed} of {requested} worker threads ({started} running)")]
    ThreadCreate {
        /// Number of workers the pool attempted to spawn.
        requested: usize,
        /// Number of workers actually running after the call.
        started: usize,
        /// Number of workers whose spawn failed.
        failed: usize,
    },

    /// A caller-supplied value was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An otherwise-unclassified platform failure, by OS reason code.
    #[error("system error code {0}")]
    System(i32),
}
