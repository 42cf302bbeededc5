//! # Event subscribers for the registry.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and the built-in [`LogWriter`] (behind the `logging` feature).
//!
//! ## Architecture
//! ```text
//! TaskRegistry ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                             │
//!                                                    ┌────────┼────────┐
//!                                                    ▼        ▼        ▼
//!                                                LogWriter  Metrics  Custom
//! ```

mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use log::render;
pub(crate) use set::SubscriberSet;
pub use subscribe::Subscribe;
