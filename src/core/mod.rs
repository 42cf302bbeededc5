//! Registry core: the task store and how it is built.
//!
//! Internal modules:
//! - [`registry`]: the task map, cursor and completion arbiter;
//! - [`builder`]: wires timer, worker callback, config and subscribers;
//! - [`id`]: task identifiers and their allocator;
//! - [`record`]: the stored unit of pending work;
//! - [`config`]: registry settings;
//! - [`wakeup`]: `Notify`-backed worker wake signal.

mod builder;
mod config;
mod id;
mod record;
mod registry;
mod wakeup;

pub use builder::RegistryBuilder;
pub use config::RegistryConfig;
pub use id::TaskId;
pub use registry::{TaskRegistry, WakeFn};
pub use wakeup::Wakeup;
