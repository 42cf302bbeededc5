//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! The line format from `render` is also what the registry writes to
//! stderr for callback failures that no receiver observed. The subscriber
//! itself is exported only with the `logging` feature.
//!
//! ## Example output
//! ```text
//! [submitted] task=1 timeout_ms=5000
//! [worker-woken] task=1
//! [completed] task=1
//! [expired] task=2 timeout_ms=5000
//! [cancelled] task=3
//! [callback-failed] task=4 err="callback failed: socket closed"
//! [subscriber-overflow] subscriber="metrics" reason="full"
//! ```

#[cfg(feature = "logging")]
use async_trait::async_trait;

use crate::events::{Event, EventKind};
#[cfg(feature = "logging")]
use crate::subscribers::Subscribe;

/// Renders one event as a single log line.
pub(crate) fn render(e: &Event) -> String {
    let task = e
        .task
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    match e.kind {
        EventKind::TaskSubmitted => {
            format!("[submitted] task={task} timeout_ms={:?}", e.timeout_ms)
        }
        EventKind::WorkerWoken => format!("[worker-woken] task={task}"),
        EventKind::TaskCompleted => format!("[completed] task={task}"),
        EventKind::TaskExpired => {
            format!("[expired] task={task} timeout_ms={:?}", e.timeout_ms)
        }
        EventKind::TaskCancelled => format!("[cancelled] task={task}"),
        EventKind::CallbackFailed => {
            format!("[callback-failed] task={task} err={:?}", e.reason)
        }
        EventKind::CallbackPanicked => {
            format!("[callback-panicked] task={task} info={:?}", e.reason)
        }
        EventKind::SubscriberOverflow => format!(
            "[subscriber-overflow] subscriber={:?} reason={:?}",
            e.subscriber, e.reason
        ),
        EventKind::SubscriberPanicked => format!(
            "[subscriber-panicked] subscriber={} info={}",
            e.subscriber.unwrap_or("unknown"),
            e.reason.as_deref().unwrap_or("unknown"),
        ),
    }
}

/// Event writer subscriber.
#[cfg(feature = "logging")]
#[derive(Default)]
pub struct LogWriter;

#[cfg(feature = "logging")]
impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one event as a single log line.
    pub fn render(e: &Event) -> String {
        render(e)
    }
}

#[cfg(feature = "logging")]
#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
