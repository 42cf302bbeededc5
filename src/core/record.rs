//! Stored unit of pending work.

use std::sync::Arc;
use std::time::Duration;

use crate::tasks::Completion;
use crate::timer::Alarm;

/// Input, callback and timeout alarm of one pending task.
///
/// Dropping a record cancels its alarm and drops its callback unrun.
pub(crate) struct TaskRecord<I, O> {
    pub(crate) input: Arc<I>,
    pub(crate) on_complete: Completion<O>,
    pub(crate) timeout: Duration,
    /// `None` only between insertion and the alarm being attached.
    pub(crate) alarm: Option<Alarm>,
}

impl<I, O> TaskRecord<I, O> {
    pub(crate) fn new(input: I, timeout: Duration, on_complete: Completion<O>) -> Self {
        Self {
            input: Arc::new(input),
            on_complete,
            timeout,
            alarm: None,
        }
    }
}
