//! The worker pool driving a shared task queue.

use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::core::error::QueueError;
use crate::core::queue::{CancelToken, TaskQueue};

/// How long `stop(join)` waits for one worker before detaching it.
const JOIN_GRACE: Duration = Duration::from_secs(2);

/// A fixed set of OS worker threads draining one [`TaskQueue`].
///
/// Each worker loops: check for a pending cancellation request, blocking-pop
/// one task, run it. The pool holds a shared reference to the queue (via
/// [`Arc`]), never exclusive ownership — producers keep pushing through
/// their own handles while workers drain.
///
/// Lifecycle: configured by [`new`](WorkerPool::new), running after
/// [`start`](WorkerPool::start), stopped by [`stop`](WorkerPool::stop).
/// Cancellation is cooperative and single-shot; to run workers again after
/// a stop, build a fresh pool against the same queue. Dropping a pool that
/// was never stopped requests cancellation but does not join — workers are
/// detached and exit at their next wait.
pub struct WorkerPool<A> {
    queue: Arc<TaskQueue<A>>,
    workers: Mutex<Vec<Option<JoinHandle<()>>>>,
    start_errors: Mutex<Vec<i32>>,
    cancel: CancelToken,
    max_threads: usize,
    stack_size: Option<usize>,
}

impl<A: Send + 'static> WorkerPool<A> {
    /// Configures a pool of `max_threads` workers over `queue`.
    ///
    /// Allocates one join-handle slot and one startup-error slot
    /// (zero-initialized) per worker. No threads are spawned yet.
    ///
    /// # Errors
    ///
    /// - [`QueueError::InvalidArgument`] if `max_threads` is zero.
    /// - [`QueueError::Allocation`] if either slot array cannot be
    ///   reserved; nothing is leaked on failure.
    pub fn new(queue: Arc<TaskQueue<A>>, max_threads: usize) -> Result<Self, QueueError> {
        if max_threads == 0 {
            return Err(QueueError::InvalidArgument(
                "max_threads must be greater than 0".into(),
            ));
        }
        let mut workers = Vec::new();
        workers.try_reserve_exact(max_threads)?;
        workers.resize_with(max_threads, || None);
        let mut start_errors = Vec::new();
        start_errors.try_reserve_exact(max_threads)?;
        start_errors.resize(max_threads, 0);
        Ok(Self {
            queue,
            workers: Mutex::new(workers),
            start_errors: Mutex::new(start_errors),
            cancel: CancelToken::new(),
            max_threads,
            stack_size: None,
        })
    }

    /// Configures a pool from a validated [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidArgument`] if the config fails validation, or
    /// any error [`WorkerPool::new`] can produce.
    pub fn from_config(queue: Arc<TaskQueue<A>>, config: &PoolConfig) -> Result<Self, QueueError> {
        config.validate().map_err(QueueError::InvalidArgument)?;
        let mut pool = Self::new(queue, config.worker_count)?;
        pool.stack_size = config.thread_stack_size;
        Ok(pool)
    }

    /// Spawns the pool's workers and returns how many are running.
    ///
    /// A worker that fails to spawn records the platform reason code in its
    /// startup-error slot and is skipped; the remaining workers still
    /// start. Partial starts are therefore reported, not rolled back: the
    /// call fails with [`QueueError::ThreadCreate`] naming the started
    /// count while the started workers keep draining the queue.
    ///
    /// # Errors
    ///
    /// [`QueueError::ThreadCreate`] if any worker failed to spawn.
    pub fn start(&self) -> Result<usize, QueueError> {
        let mut workers = self.workers.lock();
        let mut start_errors = self.start_errors.lock();
        let mut started = 0;
        let mut failed = 0;
        for (index, slot) in workers.iter_mut().enumerate() {
            if slot.is_some() {
                started += 1;
                continue;
            }
            let mut builder = thread::Builder::new().name(format!("wq-worker-{index}"));
            if let Some(bytes) = self.stack_size {
                builder = builder.stack_size(bytes);
            }
            let queue = Arc::clone(&self.queue);
            let cancel = self.cancel.clone();
            match builder.spawn(move || worker_loop(index, &queue, &cancel)) {
                Ok(handle) => {
                    *slot = Some(handle);
                    start_errors[index] = 0;
                    started += 1;
                }
                Err(err) => {
                    start_errors[index] = err.raw_os_error().unwrap_or(-1);
                    failed += 1;
                    warn!(worker = index, error = %err, "failed to spawn worker");
                }
            }
        }
        if failed == 0 {
            info!(workers = started, "worker pool started");
            Ok(started)
        } else {
            Err(QueueError::ThreadCreate {
                requested: self.max_threads,
                started,
                failed,
            })
        }
    }

    /// Requests cancellation of every worker.
    ///
    /// Cancellation takes effect at each worker's blocking-pop wait — the
    /// only suspension point — and leaves the queue lock released. With
    /// `join`, the call waits for every worker to actually terminate; a
    /// worker that does not exit within a grace period (for example, one
    /// wedged inside a task) is detached rather than failing the stop.
    /// Without `join`, the call returns as soon as cancellation has been
    /// requested.
    ///
    /// Calling `stop` again is safe and idempotent.
    ///
    /// # Errors
    ///
    /// None currently; the `Result` keeps the stop path uniform with the
    /// rest of the pool surface.
    pub fn stop(&self, join: bool) -> Result<(), QueueError> {
        self.cancel.cancel();
        self.queue.interrupt();
        if !join {
            return Ok(());
        }
        let mut workers = self.workers.lock();
        for (index, slot) in workers.iter_mut().enumerate() {
            let Some(handle) = slot.take() else { continue };
            // Join through a helper thread so a wedged worker can be
            // detached instead of hanging the stop.
            let (tx, rx) = mpsc::channel();
            let waiter = thread::spawn(move || {
                let outcome = handle.join();
                let _ = tx.send(outcome.is_ok());
            });
            match rx.recv_timeout(JOIN_GRACE) {
                Ok(true) => debug!(worker = index, "worker joined"),
                Ok(false) => warn!(worker = index, "worker panicked"),
                Err(_) => {
                    warn!(worker = index, "worker did not exit in time; detaching");
                    continue;
                }
            }
            let _ = waiter.join();
        }
        info!("worker pool stopped");
        Ok(())
    }

    /// The recorded startup failure reason for worker `index`.
    ///
    /// Zero means the worker spawned cleanly (or has not been started).
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidArgument`] if `index >= max_threads`.
    pub fn startup_error(&self, index: usize) -> Result<i32, QueueError> {
        if index >= self.max_threads {
            return Err(QueueError::InvalidArgument(
                "worker index out of range".into(),
            ));
        }
        Ok(self.start_errors.lock()[index])
    }

    /// Number of worker slots in the pool.
    #[must_use]
    pub const fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// The queue this pool drains.
    #[must_use]
    pub const fn queue(&self) -> &Arc<TaskQueue<A>> {
        &self.queue
    }
}

impl<A> Drop for WorkerPool<A> {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            self.queue.interrupt();
            debug!("worker pool dropped without explicit stop; workers detached");
        }
    }
}

/// One worker's life: check cancellation, blocking-pop, run, repeat.
fn worker_loop<A>(index: usize, queue: &TaskQueue<A>, cancel: &CancelToken) {
    debug!(worker = index, "worker started");
    loop {
        if cancel.is_cancelled() {
            break;
        }
        match queue.pop_cancellable(cancel) {
            Ok(task) => task.run(),
            Err(_) => break,
        }
    }
    debug!(worker = index, "worker exiting");
}
