//! Fixed-capacity circular buffer backend.

use crate::core::error::QueueError;
use crate::core::task::Task;

/// A circular slot array holding up to `capacity` tasks.
///
/// `front` names the last consumed slot and `back` the last filled slot;
/// the live region is the circular span `(front, back]`. Slots outside that
/// span hold `None`. Traversal is index-based throughout, so a resize can
/// swap the slot array without leaving anything dangling.
#[derive(Debug)]
pub struct RingBuffer<A> {
    slots: Vec<Option<Task<A>>>,
    front: usize,
    back: usize,
    len: usize,
    capacity: usize,
}

impl<A> RingBuffer<A> {
    /// Allocates a buffer with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if the slot array cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);
        Ok(Self {
            slots,
            front: 0,
            back: 0,
            len: 0,
            capacity,
        })
    }

    /// Next index in the circular order.
    const fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity {
            0
        } else {
            next
        }
    }

    /// Writes `task` into the slot after `back`.
    ///
    /// No capacity check: the synchronized layer is the only caller and
    /// rejects pushes against a full queue before delegating here.
    pub fn push(&mut self, task: Task<A>) {
        self.back = self.advance(self.back);
        self.slots[self.back] = Some(task);
        self.len += 1;
    }

    /// Takes the task in the slot after `front` and advances `front`.
    ///
    /// Returns `None` when empty; callers are expected to have checked.
    pub fn pop(&mut self) -> Option<Task<A>> {
        if self.len == 0 {
            return None;
        }
        let next = self.advance(self.front);
        let task = self.slots[next].take()?;
        self.front = next;
        self.len -= 1;
        Some(task)
    }

    /// Clones the task in the slot after `front` without advancing.
    pub fn peek(&self) -> Option<Task<A>>
    where
        A: Clone,
    {
        if self.len == 0 {
            return None;
        }
        self.slots[self.advance(self.front)].clone()
    }

    /// Replaces the slot array with one of `new_capacity` slots.
    ///
    /// Exactly `min(len, new_capacity)` of the most recently pushed tasks
    /// survive, in their original relative order; the oldest overflow is
    /// dropped. `front`/`back` are recomputed against the new buffer. The
    /// index arithmetic follows from that contract alone — live tasks are
    /// drained in FIFO order and re-laid-out from slot 1, which makes the
    /// wrap-around cases fall out for free.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if the new slot array cannot be reserved;
    /// the original buffer is untouched and remains usable.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), QueueError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(new_capacity)?;
        slots.resize_with(new_capacity, || None);

        let keep = self.len.min(new_capacity);
        for _ in 0..self.len - keep {
            let _ = self.pop();
        }
        for offset in 0..keep {
            slots[(offset + 1) % new_capacity] = self.pop();
        }

        self.slots = slots;
        self.front = 0;
        self.back = if new_capacity == 0 {
            0
        } else {
            keep % new_capacity
        };
        self.len = keep;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Number of tasks currently stored.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no tasks are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every slot is occupied.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Number of allocated slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
