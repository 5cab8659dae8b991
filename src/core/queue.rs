//! The synchronized bounded task queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::debug;

use crate::backend::{Backend, BackendKind};
use crate::config::QueueConfig;
use crate::core::error::QueueError;
use crate::core::task::Task;

/// Whether an operation may suspend the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocking {
    /// Fail immediately instead of waiting. A contended queue lock reports
    /// [`QueueError::LockUnavailable`]; an empty queue reports
    /// [`QueueError::Empty`].
    No,
    /// Wait for the lock and, on the consumer side, for a task to arrive.
    Yes,
}

/// Cooperative cancellation flag shared between a pool and its workers.
///
/// Cancellation is requested once and never revoked. A worker blocked in
/// [`TaskQueue::pop_cancellable`] observes the flag after every wakeup;
/// pair [`cancel`](CancelToken::cancel) with [`TaskQueue::interrupt`] so
/// that sleeping waiters actually wake to look.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Backend state guarded by the queue lock.
///
/// `size` mirrors the backend's count and is authoritative for every
/// blocking decision; it only changes with the lock held.
struct State<A> {
    backend: Backend<A>,
    size: usize,
    capacity: usize,
}

/// A thread-safe bounded FIFO of [`Task`]s over a single storage backend.
///
/// The queue owns exactly one backend, one mutex, and one condition
/// variable; no other component in the crate touches synchronization
/// primitives. Tasks are delivered in push order for both backends, and
/// each dequeue is atomic with respect to every other — no duplicate
/// delivery, no lost task.
///
/// Pushing never waits for space: a push against a full queue fails with
/// [`QueueError::Full`] even in blocking mode. The queue bounds capacity;
/// it does not implement flow control.
///
/// Share a queue by wrapping it in [`Arc`]; dropping the last handle
/// destroys it, so destruction cannot race live operations.
pub struct TaskQueue<A> {
    state: Mutex<State<A>>,
    available: Condvar,
}

impl<A> TaskQueue<A> {
    /// Creates a queue over the backend named by `kind`, holding at most
    /// `capacity` tasks.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if backend storage cannot be reserved.
    pub fn new(kind: BackendKind, capacity: usize) -> Result<Self, QueueError> {
        let backend = Backend::new(kind, capacity)?;
        Ok(Self {
            state: Mutex::new(State {
                backend,
                size: 0,
                capacity,
            }),
            available: Condvar::new(),
        })
    }

    /// Creates a queue from a validated [`QueueConfig`].
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidArgument`] if the config fails validation, or
    /// any error [`TaskQueue::new`] can produce.
    pub fn from_config(config: &QueueConfig) -> Result<Self, QueueError> {
        config.validate().map_err(QueueError::InvalidArgument)?;
        Self::new(config.backend, config.capacity)
    }

    /// Takes the queue lock per `blocking`.
    fn acquire(&self, blocking: Blocking) -> Result<MutexGuard<'_, State<A>>, QueueError> {
        match blocking {
            Blocking::Yes => Ok(self.state.lock()),
            Blocking::No => self.state.try_lock().ok_or(QueueError::LockUnavailable),
        }
    }

    /// Appends `task` at the back of the queue.
    ///
    /// When the queue transitions from empty to non-empty, exactly one
    /// waiting consumer is woken. The lock is released on every exit path,
    /// including backend failure.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Full`] if `size == capacity`; `size` is unchanged.
    /// - [`QueueError::LockUnavailable`] for a contended non-blocking call.
    /// - [`QueueError::Allocation`] if the backend cannot store the task.
    pub fn push(&self, task: Task<A>, blocking: Blocking) -> Result<(), QueueError> {
        let mut state = self.acquire(blocking)?;
        if state.size == state.capacity {
            return Err(QueueError::Full);
        }
        state.backend.push(task)?;
        state.size += 1;
        if state.size == 1 {
            self.available.notify_one();
        }
        Ok(())
    }

    /// Removes and returns the task at the front of the queue.
    ///
    /// In blocking mode an empty queue suspends the caller on the condition
    /// variable until a producer signals; emptiness is re-checked after
    /// every wakeup, so spurious wakeups and multi-waiter races only ever
    /// cost another loop iteration.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Empty`] if empty and non-blocking; `size` unchanged.
    /// - [`QueueError::LockUnavailable`] for a contended non-blocking call.
    pub fn pop(&self, blocking: Blocking) -> Result<Task<A>, QueueError> {
        let mut state = self.acquire(blocking)?;
        while state.size == 0 {
            if blocking == Blocking::No {
                return Err(QueueError::Empty);
            }
            self.available.wait(&mut state);
        }
        let task = state.backend.pop().ok_or(QueueError::Empty)?;
        state.size -= 1;
        Ok(task)
    }

    /// Blocking pop whose wait aborts when `cancel` fires.
    ///
    /// This is the worker pool's suspension point. The guard drops on every
    /// path out of the wait, so cancellation can never leave the queue lock
    /// held, and a cancelled wait performs no partial dequeue.
    ///
    /// # Errors
    ///
    /// [`QueueError::Cancelled`] once cancellation is observed.
    pub fn pop_cancellable(&self, cancel: &CancelToken) -> Result<Task<A>, QueueError> {
        let mut state = self.state.lock();
        while state.size == 0 {
            if cancel.is_cancelled() {
                return Err(QueueError::Cancelled);
            }
            self.available.wait(&mut state);
        }
        let task = state.backend.pop().ok_or(QueueError::Empty)?;
        state.size -= 1;
        Ok(task)
    }

    /// Returns a copy of the task at the front without removing it.
    ///
    /// Blocking behavior matches [`pop`](TaskQueue::pop); `size` is never
    /// changed.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Empty`] if empty and non-blocking.
    /// - [`QueueError::LockUnavailable`] for a contended non-blocking call.
    pub fn peek(&self, blocking: Blocking) -> Result<Task<A>, QueueError>
    where
        A: Clone,
    {
        let mut state = self.acquire(blocking)?;
        while state.size == 0 {
            if blocking == Blocking::No {
                return Err(QueueError::Empty);
            }
            self.available.wait(&mut state);
        }
        state.backend.peek().ok_or(QueueError::Empty)
    }

    /// Wakes every blocked consumer so it can observe cancellation.
    ///
    /// The lock is taken around the notify: a consumer is then either
    /// before its emptiness check (and will see the cancel flag) or already
    /// waiting (and receives this wakeup). Without the lock a consumer
    /// could check the flag, lose the race, and sleep through the notify.
    pub fn interrupt(&self) {
        let _state = self.state.lock();
        self.available.notify_all();
    }

    /// Retargets the queue to hold at most `new_capacity` tasks.
    ///
    /// Shrinking below the current occupancy silently discards tasks per
    /// backend rules (the ring buffer keeps the most recent, the linked
    /// list keeps the head-side prefix) — documented data loss, not an
    /// error. `size` is clamped to the new capacity.
    ///
    /// # Errors
    ///
    /// - [`QueueError::LockUnavailable`] for a contended non-blocking call.
    /// - [`QueueError::Allocation`] if the backend reallocation fails; the
    ///   queue is unchanged and remains usable.
    pub fn resize(&self, new_capacity: usize, blocking: Blocking) -> Result<(), QueueError> {
        let mut state = self.acquire(blocking)?;
        state.backend.resize(new_capacity)?;
        state.size = state.size.min(new_capacity);
        state.capacity = new_capacity;
        debug!(capacity = new_capacity, size = state.size, "queue resized");
        Ok(())
    }

    /// Whether the queue currently holds no tasks.
    ///
    /// Point-in-time answer: it may be stale the moment it returns, so it
    /// must not be treated as a guarantee for a subsequent operation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().size == 0
    }

    /// Whether the queue currently holds `capacity` tasks.
    ///
    /// Point-in-time answer, same caveat as [`is_empty`](TaskQueue::is_empty).
    #[must_use]
    pub fn is_full(&self) -> bool {
        let state = self.state.lock();
        state.size == state.capacity
    }

    /// Number of tasks currently retrievable. Point-in-time answer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().size
    }

    /// Maximum number of tasks the queue may hold at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }
}
