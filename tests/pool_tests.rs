//! Integration tests for the worker pool.
//!
//! The scenarios mirror real producer/worker traffic: many more tasks than
//! queue slots, a mix of fast and slow actions, and shutdown while the
//! workers are parked on an empty queue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use workqueue::{BackendKind, Blocking, QueueError, Task, TaskQueue, WorkerPool};

const WAIT_LIMIT: Duration = Duration::from_secs(10);

fn bump(counter: Arc<AtomicUsize>) {
    counter.fetch_add(1, Ordering::SeqCst);
}

fn bump_slowly(counter: Arc<AtomicUsize>) {
    // Enough spinning to keep the queue near capacity under load.
    for _ in 0..10_000 {
        std::hint::black_box(0_u64);
    }
    counter.fetch_add(1, Ordering::SeqCst);
}

fn wait_for(counter: &AtomicUsize, target: usize) {
    let deadline = Instant::now() + WAIT_LIMIT;
    while counter.load(Ordering::SeqCst) < target {
        assert!(Instant::now() < deadline, "workers did not drain in time");
        thread::yield_now();
    }
}

#[test]
fn four_workers_drain_one_hundred_mixed_tasks() {
    let queue = Arc::new(TaskQueue::new(BackendKind::RingBuffer, 25).unwrap());
    let pool = WorkerPool::new(Arc::clone(&queue), 4).unwrap();
    assert_eq!(pool.start().unwrap(), 4);

    let counter = Arc::new(AtomicUsize::new(0));
    for i in 0..100 {
        // Every third task is slow, the rest are quick bumps.
        let task = if i % 3 == 0 {
            Task::new(bump_slowly, Arc::clone(&counter))
        } else {
            Task::new(bump, Arc::clone(&counter))
        };
        // Blocking pushes never wait for space, so spin on Full while
        // the workers catch up.
        loop {
            match queue.push(task.clone(), Blocking::Yes) {
                Ok(()) => break,
                Err(QueueError::Full) => thread::yield_now(),
                Err(err) => panic!("unexpected push failure: {err}"),
            }
        }
    }

    wait_for(&counter, 100);
    pool.stop(true).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
    assert!(queue.is_empty());
}

fn record(state: (Arc<Mutex<Vec<usize>>>, usize)) {
    let (log, id) = state;
    log.lock().push(id);
}

#[test]
fn every_task_runs_exactly_once() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 25;
    const WORKERS: usize = 4;
    const TOTAL: usize = PRODUCERS * PER_PRODUCER;

    let queue = Arc::new(TaskQueue::new(BackendKind::LinkedList, 10).unwrap());
    let pool = WorkerPool::new(Arc::clone(&queue), WORKERS).unwrap();
    pool.start().unwrap();

    let log: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

    let mut producers = Vec::new();
    for p in 0..PRODUCERS {
        let queue = Arc::clone(&queue);
        let log = Arc::clone(&log);
        producers.push(thread::spawn(move || {
            for k in 0..PER_PRODUCER {
                let id = p * PER_PRODUCER + k;
                let task = Task::new(record, (Arc::clone(&log), id));
                loop {
                    match queue.push(task.clone(), Blocking::No) {
                        Ok(()) => break,
                        Err(QueueError::Full | QueueError::LockUnavailable) => {
                            thread::yield_now();
                        }
                        Err(err) => panic!("unexpected push failure: {err}"),
                    }
                }
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }

    let deadline = Instant::now() + WAIT_LIMIT;
    while log.lock().len() < TOTAL {
        assert!(Instant::now() < deadline, "workers did not drain in time");
        thread::yield_now();
    }
    pool.stop(true).unwrap();

    let mut ids = log.lock().clone();
    ids.sort_unstable();
    assert_eq!(ids, (0..TOTAL).collect::<Vec<_>>());
}

#[test]
fn stop_on_empty_queue_does_not_deadlock() {
    let queue: Arc<TaskQueue<usize>> =
        Arc::new(TaskQueue::new(BackendKind::RingBuffer, 8).unwrap());
    let pool = WorkerPool::new(Arc::clone(&queue), 3).unwrap();
    pool.start().unwrap();

    // Workers are parked in a blocking pop; stop must wake and join them.
    thread::sleep(Duration::from_millis(50));
    pool.stop(true).unwrap();
}

#[test]
fn stop_is_idempotent() {
    let queue: Arc<TaskQueue<usize>> =
        Arc::new(TaskQueue::new(BackendKind::LinkedList, 8).unwrap());
    let pool = WorkerPool::new(Arc::clone(&queue), 2).unwrap();
    pool.start().unwrap();

    pool.stop(false).unwrap();
    pool.stop(true).unwrap();
    pool.stop(true).unwrap();
}

#[test]
fn startup_errors_are_zero_after_clean_start() {
    let queue: Arc<TaskQueue<usize>> =
        Arc::new(TaskQueue::new(BackendKind::RingBuffer, 8).unwrap());
    let pool = WorkerPool::new(Arc::clone(&queue), 2).unwrap();
    pool.start().unwrap();

    assert_eq!(pool.startup_error(0).unwrap(), 0);
    assert_eq!(pool.startup_error(1).unwrap(), 0);
    assert!(matches!(
        pool.startup_error(2),
        Err(QueueError::InvalidArgument(_))
    ));
    pool.stop(true).unwrap();
}

#[test]
fn zero_workers_is_rejected() {
    let queue: Arc<TaskQueue<usize>> =
        Arc::new(TaskQueue::new(BackendKind::RingBuffer, 8).unwrap());
    assert!(matches!(
        WorkerPool::new(queue, 0),
        Err(QueueError::InvalidArgument(_))
    ));
}

#[test]
fn queue_outlives_a_stopped_pool() {
    let queue: Arc<TaskQueue<usize>> =
        Arc::new(TaskQueue::new(BackendKind::RingBuffer, 8).unwrap());
    {
        let pool = WorkerPool::new(Arc::clone(&queue), 2).unwrap();
        pool.start().unwrap();
        pool.stop(true).unwrap();
    }
    // The queue is still usable after the pool is gone.
    queue.push(Task::new(noop, 1), Blocking::Yes).unwrap();
    assert_eq!(*queue.pop(Blocking::No).unwrap().argument(), 1);
}

fn noop(_value: usize) {}

#[test]
fn fresh_pool_resumes_a_drained_queue() {
    let queue = Arc::new(TaskQueue::new(BackendKind::RingBuffer, 8).unwrap());
    let counter = Arc::new(AtomicUsize::new(0));

    let first = WorkerPool::new(Arc::clone(&queue), 2).unwrap();
    first.start().unwrap();
    for _ in 0..5 {
        queue
            .push(Task::new(bump, Arc::clone(&counter)), Blocking::Yes)
            .unwrap();
    }
    wait_for(&counter, 5);
    first.stop(true).unwrap();

    // Cancellation is single-shot per pool; a second pool picks the
    // same queue back up.
    let second = WorkerPool::new(Arc::clone(&queue), 2).unwrap();
    second.start().unwrap();
    for _ in 0..5 {
        queue
            .push(Task::new(bump, Arc::clone(&counter)), Blocking::Yes)
            .unwrap();
    }
    wait_for(&counter, 10);
    second.stop(true).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}
