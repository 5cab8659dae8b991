//! # workqueue
//!
//! A bounded, thread-safe queue of deferred function invocations ("tasks"),
//! consumed by a fixed pool of dedicated OS worker threads.
//!
//! This crate is infrastructure for building producer/consumer execution
//! engines (job servers, batching layers). It deliberately stays small: a
//! task is a plain procedure reference bound to one argument, the queue is a
//! capacity-limited FIFO over a pluggable storage backend, and the pool is a
//! fixed set of threads that blocking-pop and run tasks until cancelled.
//!
//! ## Design
//!
//! - **Pluggable storage without inheritance**: the [`backend`] module holds
//!   a closed set of storage variants (ring buffer, linked list) chosen once
//!   at queue construction and dispatched through a `match`. Backends are raw
//!   storage; they know nothing about threads or locks.
//! - **One lock, one condition variable**: [`TaskQueue`] is the only
//!   component that touches synchronization primitives. Consumers wait on a
//!   condition variable in a predicate loop; producers never wait for space —
//!   a push against a full queue fails with [`QueueError::Full`] (capacity
//!   limiting, not flow control).
//! - **Cooperative cancellation**: a worker's only suspension point is the
//!   queue's blocking pop. Cancellation takes effect there, and the RAII
//!   mutex guard guarantees the queue lock is released on the way out.
//! - **Fire and forget**: task return values are not collected.
//!
//! ## Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use workqueue::{BackendKind, Blocking, Task, TaskQueue, WorkerPool};
//!
//! fn bump(counter: Arc<AtomicUsize>) {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }
//!
//! # fn main() -> Result<(), workqueue::QueueError> {
//! let queue = Arc::new(TaskQueue::new(BackendKind::RingBuffer, 25)?);
//! let pool = WorkerPool::new(Arc::clone(&queue), 4)?;
//! pool.start()?;
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! for _ in 0..10 {
//!     queue.push(Task::new(bump, Arc::clone(&counter)), Blocking::Yes)?;
//! }
//!
//! while counter.load(Ordering::SeqCst) < 10 {
//!     std::thread::yield_now();
//! }
//! pool.stop(true)?;
//! # Ok(())
//! # }
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Storage backends for the synchronized queue.
pub mod backend;
/// Configuration models for queues and worker pools.
pub mod config;
/// The synchronized queue, the worker pool, and their shared error taxonomy.
pub mod core;
/// Shared utilities.
pub mod util;

pub use crate::backend::BackendKind;
pub use crate::core::{Blocking, CancelToken, QueueError, Task, TaskQueue, WorkerPool};
