//! Registry events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TaskRegistry` (submit/complete/cancel/expiry/callback failures),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the subscriber listener spawned by
//!   [`RegistryBuilder::build`](crate::RegistryBuilder::build), and any raw
//!   receiver obtained with [`TaskRegistry::subscribe`](crate::TaskRegistry::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
