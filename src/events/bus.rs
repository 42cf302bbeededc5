//! # Event bus for broadcasting registry events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from every registry operation (producers,
//! the worker, and timer callbacks alike).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Subscriber (one):
//!   submit   ──┐
//!   complete ──┼──────► Bus ───────► subscriber listener ────► SubscriberSet
//!   cancel   ──┤  (broadcast chan)     (spawned by builder)
//!   alarm    ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and needs no runtime.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time;
//!   `publish()` reports that so callers can fall back to stderr.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for registry events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// Returns `false` if there were no receivers and the event was dropped.
    pub fn publish(&self, ev: Event) -> bool {
        self.tx.send(ev).is_ok()
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
