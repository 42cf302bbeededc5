//! # Registry configuration.
//!
//! Provides [`RegistryConfig`] centralized settings for a
//! [`TaskRegistry`](crate::TaskRegistry), applied through
//! [`RegistryBuilder::with_config`](crate::RegistryBuilder::with_config).
//!
//! Timeouts are chosen per submission; `default_timeout` is only used by
//! [`TaskRegistry::submit_default`](crate::TaskRegistry::submit_default).

use std::time::Duration;

/// Settings for a task registry.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `default_timeout`: Timeout for `submit_default` (`0s` = expire on the timer's next tick)
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,

    /// Timeout applied by `submit_default`.
    pub default_timeout: Duration,
}

impl RegistryConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RegistryConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `default_timeout = 30s`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            default_timeout: Duration::from_secs(30),
        }
    }
}
