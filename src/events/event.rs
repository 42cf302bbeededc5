//! # Registry events emitted on every task transition.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: submission, worker wake-up, completion, expiry, cancellation
//! - **Callback events**: a completion callback returned an error or panicked
//! - **Subscriber events**: overflow or panic inside a subscriber worker
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! task id, reasons, and timeouts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskline::{Event, EventKind, TaskId};
//!
//! let id = TaskId::new(7).unwrap();
//! let ev = Event::new(EventKind::TaskExpired)
//!     .with_task(id)
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::TaskExpired);
//! assert_eq!(ev.task, Some(id));
//! assert_eq!(ev.timeout_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::TaskId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task lifecycle events ===
    /// Task was accepted and its timeout alarm requested.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `timeout_ms`: requested timeout (ms)
    TaskSubmitted,

    /// The worker-wake callback was invoked (registry went from empty to non-empty).
    ///
    /// Sets:
    /// - `task`: id of the submission that caused the transition
    WorkerWoken,

    /// Task was completed by an explicit response.
    ///
    /// Sets:
    /// - `task`: task id
    TaskCompleted,

    /// Task timeout alarm fired before any other trigger removed it.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `timeout_ms`: the timeout that elapsed (ms)
    TaskExpired,

    /// Task was discarded without invoking its callback.
    ///
    /// Sets:
    /// - `task`: task id
    TaskCancelled,

    // === Callback events ===
    /// A completion callback returned an error.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `reason`: error message
    CallbackFailed,

    /// A completion callback panicked; the panic was caught.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `reason`: panic payload
    CallbackPanicked,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Registry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Task the event refers to, if applicable.
    pub task: Option<TaskId>,
    /// Subscriber the event refers to (subscriber events only).
    pub subscriber: Option<&'static str>,
    /// Task timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            subscriber: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, id: TaskId) -> Self {
        self.task = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow).with_reason(reason);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// Returns `true` for the three terminal task transitions.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskCompleted | EventKind::TaskExpired | EventKind::TaskCancelled
        )
    }
}
