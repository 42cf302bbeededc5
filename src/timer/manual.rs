//! # Virtual-time timer for deterministic tests.
//!
//! [`ManualTimer`] never fires on its own. Time moves only when the caller
//! invokes [`advance`](ManualTimer::advance) or [`fire_all`](ManualTimer::fire_all):
//!
//! - Same advance → same alarms fire
//! - Firing order is deterministic: by deadline, then by arming order
//! - Expiry callbacks run on the calling thread, outside the timer's lock,
//!   so they may arm new alarms (those fire on a later advance)
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//! use taskline::{ManualTimer, Timer};
//!
//! let timer = ManualTimer::new();
//! let fired = Arc::new(AtomicBool::new(false));
//! let f = fired.clone();
//! let _alarm = timer.schedule(Duration::from_secs(5), Box::new(move || f.store(true, Ordering::SeqCst)));
//!
//! assert_eq!(timer.advance(Duration::from_secs(4)), 0);
//! assert_eq!(timer.advance(Duration::from_secs(1)), 1);
//! assert!(fired.load(Ordering::SeqCst));
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{Alarm, Expiry, Timer};

/// An armed alarm waiting for virtual time to reach its deadline.
struct PendingAlarm {
    deadline: Duration,
    seq: u64,
    token: CancellationToken,
    on_expiry: Expiry,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingAlarm>,
}

/// Hand-driven timer with a virtual clock starting at zero.
#[derive(Default)]
pub struct ManualTimer {
    clock: Mutex<Clock>,
}

impl ManualTimer {
    /// Creates a timer at virtual time zero with no alarms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of armed alarms that are not cancelled.
    pub fn pending(&self) -> usize {
        self.lock()
            .pending
            .iter()
            .filter(|a| !a.token.is_cancelled())
            .count()
    }

    /// Moves virtual time forward by `by` and fires every due alarm.
    ///
    /// Returns how many expiry callbacks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut clock = self.lock();
            clock.now = clock.now.saturating_add(by);
            let now = clock.now;
            Self::take_due(&mut clock, now)
        };
        Self::fire(due)
    }

    /// Jumps to the latest armed deadline and fires everything still armed.
    pub fn fire_all(&self) -> usize {
        let due = {
            let mut clock = self.lock();
            let latest = clock
                .pending
                .iter()
                .map(|a| a.deadline)
                .max()
                .unwrap_or(clock.now);
            clock.now = clock.now.max(latest);
            let now = clock.now;
            Self::take_due(&mut clock, now)
        };
        Self::fire(due)
    }

    /// Removes due alarms (and discards cancelled ones), sorted by firing order.
    fn take_due(clock: &mut Clock, now: Duration) -> Vec<PendingAlarm> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut clock.pending)
            .into_iter()
            .filter(|a| !a.token.is_cancelled())
            .partition(|a| a.deadline <= now);
        clock.pending = rest;
        due.sort_by_key(|a| (a.deadline, a.seq));
        due
    }

    fn fire(due: Vec<PendingAlarm>) -> usize {
        let mut fired = 0;
        for alarm in due {
            if alarm.token.is_cancelled() {
                continue;
            }
            (alarm.on_expiry)();
            fired += 1;
        }
        fired
    }

    fn lock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, after: Duration, on_expiry: Expiry) -> Alarm {
        let token = CancellationToken::new();
        let mut clock = self.lock();
        clock.pending.retain(|a| !a.token.is_cancelled());
        let seq = clock.next_seq;
        clock.next_seq += 1;
        let deadline = clock.now.saturating_add(after);
        clock.pending.push(PendingAlarm {
            deadline,
            seq,
            token: token.clone(),
            on_expiry,
        });
        Alarm::new(token)
    }
}
