//! # Timer service used to arm per-task deadlines.
//!
//! The registry never sleeps itself; it asks a [`Timer`] to call back after a
//! duration and keeps the returned [`Alarm`] inside the task record.
//!
//! ## Contract
//! ```text
//! schedule(after, on_expiry) ──► Alarm
//!                                  ├─ cancel() / drop  → on_expiry never runs (best effort)
//!                                  └─ elapsed          → on_expiry() runs once
//! ```
//!
//! ## Rules
//! - `on_expiry` runs at most once, on whatever thread the timer chooses.
//! - `schedule` must **not** run `on_expiry` synchronously.
//! - Cancel is idempotent and safe after, or concurrently with, firing. A late
//!   firing is harmless: the registry ignores ids it no longer holds.
//!
//! Implementations:
//! - [`TokioTimer`] one spawned tokio task per alarm;
//! - [`ManualTimer`] virtual clock driven by hand, for deterministic tests.

mod manual;
mod tokio_timer;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub use manual::ManualTimer;
pub use tokio_timer::TokioTimer;

/// Callback run when an alarm elapses.
pub type Expiry = Box<dyn FnOnce() + Send + 'static>;

/// One-shot alarm scheduler.
pub trait Timer: Send + Sync + 'static {
    /// Arms a one-shot alarm that runs `on_expiry` after `after` unless cancelled first.
    fn schedule(&self, after: Duration, on_expiry: Expiry) -> Alarm;
}

/// Cancelable handle to a scheduled expiry.
///
/// Dropping the alarm cancels it.
#[derive(Debug)]
pub struct Alarm {
    token: CancellationToken,
}

impl Alarm {
    /// Wraps the token a timer implementation watches before firing.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Cancels the alarm. Safe to call repeatedly or after the alarm fired.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the alarm was cancelled (explicitly or by drop of a clone).
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Alarm {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
