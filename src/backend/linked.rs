//! Singly linked list backend over an index-linked slab.

use crate::core::error::QueueError;
use crate::core::task::Task;

#[derive(Debug)]
struct Node<A> {
    task: Task<A>,
    next: Option<usize>,
}

/// A singly linked chain of tasks with `head`/`tail` indices into an owned
/// slab.
///
/// Index links replace raw node pointers so the chain stays in safe Rust;
/// freed slots are recycled through a free list before the slab grows.
/// `capacity` is a soft ceiling — it is recorded here but enforced by the
/// synchronized layer, never by the list itself.
///
/// Invariants: `head` is `None` iff `len == 0`; the tail node's `next` is
/// always `None`.
#[derive(Debug)]
pub struct LinkedList<A> {
    nodes: Vec<Option<Node<A>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    capacity: usize,
}

impl<A> LinkedList<A> {
    /// Creates an empty list with `capacity` as its soft ceiling.
    ///
    /// No nodes are allocated up front.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            capacity,
        }
    }

    /// Links `task` at the tail.
    ///
    /// # Errors
    ///
    /// [`QueueError::Allocation`] if the slab cannot grow for a new node.
    /// The list is unchanged on failure — no partial link is ever applied.
    pub fn push(&mut self, task: Task<A>) -> Result<(), QueueError> {
        let node = Node { task, next: None };
        let index = if let Some(index) = self.free.pop() {
            self.nodes[index] = Some(node);
            index
        } else {
            self.nodes.try_reserve(1)?;
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        };
        match self.tail {
            Some(tail) => {
                if let Some(prev) = self.nodes[tail].as_mut() {
                    prev.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
        Ok(())
    }

    /// Detaches the head node and returns its task.
    ///
    /// Clears `tail` when the list becomes empty. Returns `None` when
    /// already empty.
    pub fn pop(&mut self) -> Option<Task<A>> {
        let index = self.head?;
        let node = self.nodes[index].take()?;
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.free.push(index);
        self.len -= 1;
        Some(node.task)
    }

    /// Clones the head node's task without detaching it.
    pub fn peek(&self) -> Option<Task<A>>
    where
        A: Clone,
    {
        let index = self.head?;
        self.nodes[index].as_ref().map(|node| node.task.clone())
    }

    /// Retargets the soft ceiling to `new_capacity`.
    ///
    /// When shrinking below the current length, walks `new_capacity` nodes
    /// from `head`, frees everything beyond that point, and re-ties `tail`
    /// to the last surviving node (clearing `head`/`tail` when
    /// `new_capacity == 0`). The head-side prefix survives.
    pub fn resize(&mut self, new_capacity: usize) {
        if new_capacity < self.len {
            if new_capacity == 0 {
                while self.pop().is_some() {}
            } else {
                let mut last = None;
                let mut cursor = self.head;
                for _ in 0..new_capacity {
                    last = cursor;
                    cursor = last
                        .and_then(|index| self.nodes[index].as_ref())
                        .and_then(|node| node.next);
                }
                while let Some(index) = cursor {
                    cursor = self.nodes[index].take().and_then(|node| node.next);
                    self.free.push(index);
                    self.len -= 1;
                }
                if let Some(index) = last {
                    if let Some(node) = self.nodes[index].as_mut() {
                        node.next = None;
                    }
                }
                self.tail = last;
            }
        }
        self.capacity = new_capacity;
    }

    /// Number of tasks currently linked.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no tasks are linked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the linked task count has reached the soft ceiling.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// The soft ceiling.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
