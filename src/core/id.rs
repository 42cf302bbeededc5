//! # Task identifiers.
//!
//! [`TaskId`] wraps a `NonZeroU64`: zero is the reserved "no task" value, and
//! in Rust it is spelled `Option<TaskId>::None` (same size as a bare `u64`).
//! Ids come from [`IdAllocator`], which lives inside the registry lock so the
//! map receives ids in allocation order.

use std::fmt;
use std::num::NonZeroU64;

/// Unique, never reused task identifier. Ordered by allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(NonZeroU64);

impl TaskId {
    /// Builds an id from its raw value; `0` is the reserved sentinel and yields `None`.
    #[inline]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(TaskId)
    }

    /// Raw numeric value (always `>= 1`).
    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<TaskId> for u64 {
    fn from(id: TaskId) -> Self {
        id.get()
    }
}

/// Strictly increasing id source starting at 1.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the next id.
    pub(crate) fn allocate(&mut self) -> TaskId {
        // Exhausting u64 is not reachable in practice.
        let next = NonZeroU64::MIN.saturating_add(self.last);
        self.last = next.get();
        TaskId(next)
    }
}
