//! # Tokio-backed timer.
//!
//! Each alarm is a spawned task racing `tokio::time::sleep` against the alarm's
//! cancellation token:
//!
//! ```text
//! schedule(after, f) ──► spawn ─┬─ token.cancelled() → exit, f dropped
//!                               └─ sleep(after)      → f()
//! ```
//!
//! The timer holds a runtime [`Handle`], so `schedule` may be called from any
//! thread, including threads outside the runtime.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::{Alarm, Expiry, Timer};
use crate::error::RegistryError;

/// Timer that arms alarms on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    /// Creates a timer that spawns alarms on the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a timer bound to the runtime of the calling thread.
    ///
    /// Returns [`RegistryError::NoRuntime`] outside a tokio runtime.
    pub fn try_current() -> Result<Self, RegistryError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| RegistryError::NoRuntime { context: "timer" })
    }
}

impl Timer for TokioTimer {
    fn schedule(&self, after: Duration, on_expiry: Expiry) -> Alarm {
        let token = CancellationToken::new();
        let watch = token.clone();

        self.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = watch.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    if !watch.is_cancelled() {
                        on_expiry();
                    }
                }
            }
        });
        Alarm::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_try_current_outside_runtime() {
        let err = TokioTimer::try_current().unwrap_err();
        assert_eq!(err.as_label(), "registry_no_runtime");
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_fires_after_duration() {
        let timer = TokioTimer::try_current().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();

        let _alarm = timer.schedule(
            Duration::from_millis(50),
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_alarm_never_fires() {
        let timer = TokioTimer::try_current().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();

        let alarm = timer.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );
        drop(alarm);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
