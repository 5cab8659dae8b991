//! Storage backends for the synchronized queue.
//!
//! A backend is raw, non-thread-safe storage of tasks. The set of variants
//! is closed and selected exactly once at queue construction; dispatch goes
//! through a `match` on [`Backend`] rather than trait objects. Backends
//! never touch synchronization primitives — the synchronized queue owns its
//! backend exclusively and only reaches it with the queue lock held.

pub mod linked;
pub mod ring;

pub use linked::LinkedList;
pub use ring::RingBuffer;

use serde::{Deserialize, Serialize};

use crate::core::error::QueueError;
use crate::core::task::Task;

/// Selects the storage strategy for a queue at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Fixed-capacity circular buffer; the whole store is one allocation.
    RingBuffer,
    /// Index-linked chain; node slots are acquired as tasks arrive.
    LinkedList,
}

/// Tagged union over the concrete storage variants.
///
/// The variant never changes after construction.
#[derive(Debug)]
pub enum Backend<A> {
    /// Ring-buffer storage.
    Ring(RingBuffer<A>),
    /// Linked-list storage.
    List(LinkedList<A>),
}

impl<A> Backend<A> {
    /// Builds the variant named by `kind` with the given capacity.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if the ring buffer's slot array cannot be
    /// reserved. The linked list allocates nothing up front.
    pub fn new(kind: BackendKind, capacity: usize) -> Result<Self, QueueError> {
        match kind {
            BackendKind::RingBuffer => Ok(Self::Ring(RingBuffer::new(capacity)?)),
            BackendKind::LinkedList => Ok(Self::List(LinkedList::new(capacity))),
        }
    }

    /// Appends a task at the back.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if a linked-list node cannot be acquired.
    /// The caller checks capacity first; backends do not.
    pub fn push(&mut self, task: Task<A>) -> Result<(), QueueError> {
        match self {
            Self::Ring(ring) => {
                ring.push(task);
                Ok(())
            }
            Self::List(list) => list.push(task),
        }
    }

    /// Removes and returns the task at the front, if any.
    pub fn pop(&mut self) -> Option<Task<A>> {
        match self {
            Self::Ring(ring) => ring.pop(),
            Self::List(list) => list.pop(),
        }
    }

    /// Returns a copy of the task at the front without removing it.
    pub fn peek(&self) -> Option<Task<A>>
    where
        A: Clone,
    {
        match self {
            Self::Ring(ring) => ring.peek(),
            Self::List(list) => list.peek(),
        }
    }

    /// Retargets the backend to `new_capacity`, truncating per variant rules.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if the ring buffer's replacement slot
    /// array cannot be reserved; the original buffer is untouched on
    /// failure.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), QueueError> {
        match self {
            Self::Ring(ring) => ring.resize(new_capacity),
            Self::List(list) => {
                list.resize(new_capacity);
                Ok(())
            }
        }
    }

    /// Number of tasks currently stored.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Ring(ring) => ring.len(),
            Self::List(list) => list.len(),
        }
    }

    /// Whether no tasks are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the stored task count has reached the variant's capacity.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        match self {
            Self::Ring(ring) => ring.is_full(),
            Self::List(list) => list.is_full(),
        }
    }
}
