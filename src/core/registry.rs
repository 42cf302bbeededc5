//! # Task registry - ordered, bounded-lifetime task store.
//!
//! The registry owns every pending task from `submit` until exactly one of
//! three triggers removes it: an explicit `complete`, its timeout alarm, or
//! `cancel`.
//!
//! ## Architecture
//! ```text
//! producers ──submit──►┌──────────────── Mutex ─────────────────┐
//!                      │ BTreeMap<TaskId, TaskRecord>  (by id)  │
//! worker ──peek/advance►│ progress (cursor, only increases)      │
//!                      │ IdAllocator                            │
//! complete/cancel ────►└────────────────────────────────────────┘
//! alarms (timer) ─────► expire(id) ──► same lookup-and-erase as complete
//! ```
//!
//! ## Rules
//! - Removal is one lookup-and-erase under the lock; the first trigger to find
//!   the id wins, every later one is a no-op.
//! - No user code runs under the lock: the wake callback, completion callbacks,
//!   the timer, and the drop of removed records all happen after it is released.
//! - The wake callback fires only when a submission finds the map empty.
//! - `advance` does not look at the current task; a skipped task stays pending
//!   until it completes, expires or is cancelled.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::DropGuard;

use crate::core::builder::RegistryBuilder;
use crate::core::config::RegistryConfig;
use crate::core::id::{IdAllocator, TaskId};
use crate::core::record::TaskRecord;
use crate::error::CallbackError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::render;
use crate::tasks::{Outcome, run_completion};
use crate::timer::{Alarm, Timer};

/// Zero-argument "new work is available" signal.
pub type WakeFn = Arc<dyn Fn() + Send + Sync + 'static>;

/// Everything guarded by the registry lock.
struct State<I, O> {
    tasks: BTreeMap<TaskId, TaskRecord<I, O>>,
    ids: IdAllocator,
    progress: u64,
}

impl<I, O> State<I, O> {
    /// Smallest pending id `>= progress`.
    fn first_from_cursor(&self) -> Option<(&TaskId, &TaskRecord<I, O>)> {
        match TaskId::new(self.progress) {
            Some(from) => self.tasks.range(from..).next(),
            None => self.tasks.iter().next(),
        }
    }
}

pub(crate) struct Shared<I, O> {
    state: Mutex<State<I, O>>,
    timer: Arc<dyn Timer>,
    wake: Option<WakeFn>,
    bus: Bus,
    cfg: RegistryConfig,
    /// Stops the subscriber listener when the last registry handle is dropped.
    _listener: Option<DropGuard>,
}

impl<I, O> Shared<I, O> {
    pub(crate) fn new(
        timer: Arc<dyn Timer>,
        wake: Option<WakeFn>,
        bus: Bus,
        cfg: RegistryConfig,
        listener: Option<DropGuard>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                tasks: BTreeMap::new(),
                ids: IdAllocator::new(),
                progress: 0,
            }),
            timer,
            wake,
            bus,
            cfg,
            _listener: listener,
        }
    }

    /// Locks the state. Poisoning is ignored: no user code runs under this lock.
    fn lock(&self) -> MutexGuard<'_, State<I, O>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lookup-and-erase, then run the callback outside the lock.
    ///
    /// Returns `true` if this call removed the task.
    fn resolve(&self, id: TaskId, outcome: Outcome<O>) -> bool {
        let removed = {
            let mut st = self.lock();
            st.tasks.remove(&id)
        };
        let Some(TaskRecord {
            on_complete,
            timeout,
            alarm,
            ..
        }) = removed
        else {
            return false;
        };
        drop(alarm);

        let ev = match &outcome {
            Outcome::Success(_) => Event::new(EventKind::TaskCompleted).with_task(id),
            Outcome::Expired => Event::new(EventKind::TaskExpired)
                .with_task(id)
                .with_timeout(timeout),
        };
        self.bus.publish(ev);

        if let Err(err) = run_completion(on_complete, outcome) {
            self.report_callback_error(id, &err);
        }
        true
    }

    fn expire(&self, id: TaskId) -> bool {
        self.resolve(id, Outcome::Expired)
    }

    /// Stores `alarm` in the record, or hands it back if the task is already gone.
    fn attach_alarm(&self, id: TaskId, alarm: Alarm) -> Option<Alarm> {
        let mut st = self.lock();
        match st.tasks.get_mut(&id) {
            Some(rec) => {
                rec.alarm = Some(alarm);
                None
            }
            None => Some(alarm),
        }
    }

    /// Publishes the failure; with no receiver on the bus it goes to stderr.
    ///
    /// Returns the line written to stderr, if any.
    fn report_callback_error(&self, id: TaskId, err: &CallbackError) -> Option<String> {
        let kind = match err {
            CallbackError::Panicked { .. } => EventKind::CallbackPanicked,
            _ => EventKind::CallbackFailed,
        };
        let ev = Event::new(kind).with_task(id).with_reason(err.to_string());
        let line = render(&ev);
        if self.bus.publish(ev) {
            return None;
        }
        eprintln!("{line}");
        Some(line)
    }
}

/// Ordered registry of pending tasks with per-task timeouts.
///
/// `I` is the input payload, `O` the response value. Cloning the registry
/// yields another handle to the same tasks.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use taskline::{ManualTimer, Outcome, TaskRegistry};
///
/// let timer = Arc::new(ManualTimer::new());
/// let registry: TaskRegistry<&str, String> = TaskRegistry::builder(timer.clone()).build().unwrap();
///
/// let id = registry.submit("ping", Duration::from_secs(5), |out: Outcome<String>| {
///     assert_eq!(out, Outcome::Success("pong".to_string()));
///     Ok(())
/// });
///
/// let (front, input) = registry.peek().unwrap();
/// assert_eq!((front, *input), (id, "ping"));
/// assert!(registry.complete(id, "pong".to_string()));
/// registry.advance();
/// assert!(registry.is_empty());
/// assert_eq!(timer.pending(), 0);
/// ```
pub struct TaskRegistry<I, O> {
    shared: Arc<Shared<I, O>>,
}

impl<I, O> Clone for TaskRegistry<I, O> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<I, O> TaskRegistry<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    /// Starts building a registry whose deadlines are armed on `timer`.
    pub fn builder(timer: Arc<dyn Timer>) -> RegistryBuilder<I, O> {
        RegistryBuilder::new(timer)
    }

    pub(crate) fn from_shared(shared: Shared<I, O>) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Accepts a task and returns its id immediately.
    ///
    /// ### Flow
    /// 1. Under the lock: allocate the id, note whether the registry was empty, insert
    /// 2. Arm the timeout alarm and attach it to the record
    /// 3. If the registry was empty before, invoke the wake callback once
    ///
    /// `on_complete` runs at most once, with [`Outcome::Success`] from
    /// [`complete`](Self::complete) or [`Outcome::Expired`] when `timeout` elapses.
    pub fn submit<F>(&self, input: I, timeout: Duration, on_complete: F) -> TaskId
    where
        F: FnOnce(Outcome<O>) -> Result<(), CallbackError> + Send + 'static,
    {
        let record = TaskRecord::new(input, timeout, Box::new(on_complete));
        let (id, must_wake) = {
            let mut st = self.shared.lock();
            let id = st.ids.allocate();
            let was_empty = st.tasks.is_empty();
            st.tasks.insert(id, record);
            (id, was_empty)
        };
        self.shared.bus.publish(
            Event::new(EventKind::TaskSubmitted)
                .with_task(id)
                .with_timeout(timeout),
        );

        let weak: Weak<Shared<I, O>> = Arc::downgrade(&self.shared);
        let alarm = self.shared.timer.schedule(
            timeout,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.expire(id);
                }
            }),
        );
        // Already resolved: dropping the fresh alarm cancels it.
        drop(self.shared.attach_alarm(id, alarm));

        if must_wake {
            if let Some(wake) = &self.shared.wake {
                wake();
                self.shared
                    .bus
                    .publish(Event::new(EventKind::WorkerWoken).with_task(id));
            }
        }
        id
    }

    /// Same as [`submit`](Self::submit) with [`RegistryConfig::default_timeout`].
    pub fn submit_default<F>(&self, input: I, on_complete: F) -> TaskId
    where
        F: FnOnce(Outcome<O>) -> Result<(), CallbackError> + Send + 'static,
    {
        self.submit(input, self.shared.cfg.default_timeout, on_complete)
    }

    /// Returns the pending task with the smallest id at or after the cursor.
    ///
    /// Moves the cursor onto that id, so repeated calls return the same task
    /// until [`advance`](Self::advance). The input stays owned by the registry;
    /// the returned `Arc` is a shared read view.
    pub fn peek(&self) -> Option<(TaskId, Arc<I>)> {
        let mut st = self.shared.lock();
        let (id, input) = {
            let (id, rec) = st.first_from_cursor()?;
            (*id, Arc::clone(&rec.input))
        };
        st.progress = id.get();
        Some((id, input))
    }

    /// Moves the cursor one past its current position.
    ///
    /// The current task is not touched; it remains pending until resolved.
    pub fn advance(&self) {
        let mut st = self.shared.lock();
        st.progress = st.progress.saturating_add(1);
    }

    /// Completes a task with an explicit response.
    ///
    /// Returns `false` (and does nothing) if the id is unknown: already
    /// completed, expired, cancelled, or never issued. A callback error or
    /// panic is published as `CallbackFailed` / `CallbackPanicked` and not
    /// returned.
    pub fn complete(&self, id: TaskId, output: O) -> bool {
        self.shared.resolve(id, Outcome::Success(output))
    }

    /// Discards a task without running its callback and clears `handle`.
    ///
    /// `*handle` is `None` afterwards whether or not anything was removed.
    /// Returns `true` if a pending task was removed.
    pub fn cancel(&self, handle: &mut Option<TaskId>) -> bool {
        let Some(id) = handle.take() else {
            return false;
        };
        let removed = {
            let mut st = self.shared.lock();
            st.tasks.remove(&id)
        };
        match removed {
            Some(record) => {
                drop(record);
                self.shared
                    .bus
                    .publish(Event::new(EventKind::TaskCancelled).with_task(id));
                true
            }
            None => false,
        }
    }

    /// Cancels every pending task; no callbacks run. Returns how many were removed.
    pub fn cancel_all(&self) -> usize {
        let drained = {
            let mut st = self.shared.lock();
            std::mem::take(&mut st.tasks)
        };
        let n = drained.len();
        for (id, record) in drained {
            drop(record);
            self.shared
                .bus
                .publish(Event::new(EventKind::TaskCancelled).with_task(id));
        }
        n
    }

    /// Returns `true` if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().tasks.is_empty()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.shared.lock().tasks.len()
    }

    /// Returns `true` if `id` is still pending.
    pub fn contains(&self, id: TaskId) -> bool {
        self.shared.lock().tasks.contains_key(&id)
    }

    /// Current cursor position (`0` before the first peek or advance).
    pub fn progress(&self) -> u64 {
        self.shared.lock().progress
    }

    /// Creates a receiver for registry events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }
}
