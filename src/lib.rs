//! # taskline
//!
//! **Taskline** is an ordered, bounded-lifetime task registry.
//!
//! Producers submit units of work with a deadline and a completion callback;
//! a single worker drains them in submission order at its own pace. Every
//! task is finished exactly once: by an explicit response, by its timeout, or
//! silently by cancellation.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer #1      producer #2      producer #N
//!       │ submit(input, timeout, cb)       │
//!       ▼                ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  TaskRegistry                                                 │
//! │  - IdAllocator (strictly increasing ids, never reused)        │
//! │  - BTreeMap<TaskId, TaskRecord> (ordered by id)               │
//! │  - progress cursor (peek / advance)                           │
//! │  - arbiter: lookup-and-erase under one mutex                  │
//! └──────┬───────────────────┬───────────────────┬────────────────┘
//!        │ 0 → 1 edge        │ schedule(timeout) │ publish(Event)
//!        ▼                   ▼                   ▼
//!   wake callback       Timer (Alarm)          Bus ──► SubscriberSet
//!   (worker)            └─► expire(id)                  └─► LogWriter, ...
//! ```
//!
//! ### Lifecycle
//! ```text
//! submit ──► pending ──┬─ complete(id, v) ──► callback(Outcome::Success(v))
//!                      ├─ timeout elapsed ──► callback(Outcome::Expired)
//!                      └─ cancel(&mut id) ──► dropped, no callback
//! ```
//! The first trigger to reach the lock wins; later triggers find the id gone
//! and do nothing.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Registry**      | Submit, ordered peek/advance, complete, cancel.          | [`TaskRegistry`], [`TaskId`], [`Outcome`]  |
//! | **Timers**        | Pluggable deadline service.                              | [`Timer`], [`TokioTimer`], [`ManualTimer`] |
//! | **Worker**        | Edge-triggered wake-up signal.                           | [`Wakeup`]                                 |
//! | **Events**        | Lifecycle and failure events with subscribers.           | [`Event`], [`Subscribe`]                   |
//! | **Errors**        | Typed errors for setup and callbacks.                    | [`RegistryError`], [`CallbackError`]       |
//! | **Configuration** | Bus capacity and default timeout.                        | [`RegistryConfig`]                         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use taskline::{Outcome, TaskRegistry, TokioTimer, Wakeup};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wakeup = Arc::new(Wakeup::new());
//!     let registry: TaskRegistry<String, String> =
//!         TaskRegistry::builder(Arc::new(TokioTimer::try_current()?))
//!             .with_worker(wakeup.waker())
//!             .build()?;
//!
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     registry.submit("hello".into(), Duration::from_secs(5), move |out: Outcome<String>| {
//!         let _ = tx.send(out);
//!         Ok(())
//!     });
//!
//!     // Worker: drain until nothing is left at or after the cursor.
//!     wakeup.notified().await;
//!     while let Some((id, input)) = registry.peek() {
//!         registry.complete(id, input.to_uppercase());
//!         registry.advance();
//!     }
//!
//!     assert_eq!(rx.await?, Outcome::Success("HELLO".to_string()));
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;
mod timer;

// ---- Public re-exports ----

pub use self::core::{RegistryBuilder, RegistryConfig, TaskId, TaskRegistry, WakeFn, Wakeup};
pub use error::{CallbackError, RegistryError};
pub use events::{Event, EventKind};
pub use subscribers::Subscribe;
pub use tasks::{Completion, Outcome};
pub use timer::{Alarm, Expiry, ManualTimer, Timer, TokioTimer};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
