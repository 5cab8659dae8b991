//! The synchronized queue, the worker pool, and their shared error taxonomy.

pub mod error;
pub mod pool;
pub mod queue;
pub mod task;

pub use error::QueueError;
pub use pool::WorkerPool;
pub use queue::{Blocking, CancelToken, TaskQueue};
pub use task::Task;
