//! # Worker wake-up signal.
//!
//! [`Wakeup`] adapts the registry's zero-argument wake callback to an async
//! worker parked on [`tokio::sync::Notify`]. A wake that arrives while the
//! worker is busy is stored as a permit, so the next `notified().await`
//! returns immediately and no submission is missed.
//!
//! ## Worker loop
//! ```text
//! loop {
//!     while let Some((id, input)) = registry.peek() {
//!         registry.complete(id, handle(input));
//!         registry.advance();
//!     }
//!     wakeup.notified().await;   // parked until the next empty → non-empty edge
//! }
//! ```

use std::sync::Arc;

use tokio::sync::Notify;

/// Edge-triggered wake signal for a single worker.
#[derive(Debug, Default)]
pub struct Wakeup {
    notify: Notify,
}

impl Wakeup {
    /// Creates a wake signal with no stored permit.
    ///
    /// Wrap it in an [`Arc`] to hand a [`waker`](Self::waker) to the registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes the worker, or stores a permit if it is not parked.
    pub fn wake(&self) {
        self.notify.notify_one();
    }

    /// Parks until [`wake`](Self::wake) is called (or returns at once if a permit is stored).
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    /// Returns a callback suitable for [`RegistryBuilder::with_worker`](crate::RegistryBuilder::with_worker).
    pub fn waker(self: &Arc<Self>) -> impl Fn() + Send + Sync + 'static {
        let me = Arc::clone(self);
        move || me.wake()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wake_before_wait_is_not_lost() {
        let wakeup = Arc::new(Wakeup::new());
        (wakeup.waker())();
        tokio::time::timeout(Duration::from_secs(1), wakeup.notified())
            .await
            .expect("stored permit");
    }

    #[tokio::test]
    async fn test_direct_wake_without_arc() {
        let wakeup = Wakeup::new();
        wakeup.wake();
        tokio::time::timeout(Duration::from_secs(1), wakeup.notified())
            .await
            .expect("stored permit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_without_wake() {
        let wakeup = Wakeup::new();
        let res = tokio::time::timeout(Duration::from_millis(10), wakeup.notified()).await;
        assert!(res.is_err());
    }
}
