//! The unit of work stored in a task queue.

/// A deferred invocation: a procedure reference bound to one argument.
///
/// The argument type `A` stands in for the untyped pointer-sized value of
/// classic function-queue designs; each queue picks one concrete type. A
/// task is immutable once constructed and moves by value into and out of
/// the queue. Return values are not collected — execution is fire and
/// forget.
#[derive(Clone, Copy, Debug)]
pub struct Task<A> {
    action: fn(A),
    argument: A,
}

impl<A> Task<A> {
    /// Binds `action` to `argument`.
    #[must_use]
    pub fn new(action: fn(A), argument: A) -> Self {
        Self { action, argument }
    }

    /// The bound procedure reference.
    #[must_use]
    pub fn action(&self) -> fn(A) {
        self.action
    }

    /// The bound argument.
    #[must_use]
    pub const fn argument(&self) -> &A {
        &self.argument
    }

    /// Consumes the task, invoking its action with its argument.
    pub fn run(self) {
        (self.action)(self.argument);
    }
}
