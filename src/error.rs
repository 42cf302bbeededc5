//! Error types used by the registry and by completion callbacks.
//!
//! This module defines two enums:
//!
//! - [`RegistryError`] — errors raised while constructing a registry or its timer.
//! - [`CallbackError`] — errors returned (or panics raised) by completion callbacks.
//!
//! Both provide `as_label` / `as_message` helpers for logs and metrics.
//! A [`CallbackError`] never reaches the caller of
//! [`TaskRegistry::complete`](crate::TaskRegistry::complete); it is published
//! on the event bus as `CallbackFailed` / `CallbackPanicked` instead.

use thiserror::Error;

/// # Errors produced while setting up the registry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A tokio runtime was required (for [`TokioTimer`](crate::TokioTimer) or
    /// subscriber workers) but none is running on this thread.
    #[error("no tokio runtime available: {context}")]
    NoRuntime {
        /// What needed the runtime.
        context: &'static str,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskline::RegistryError;
    ///
    /// let err = RegistryError::NoRuntime { context: "timer" };
    /// assert_eq!(err.as_label(), "registry_no_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::NoRuntime { .. } => "registry_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::NoRuntime { context } => format!("no runtime for {context}"),
        }
    }
}

/// # Errors produced by completion callbacks.
///
/// Callbacks return `Result<(), CallbackError>`. The registry has already
/// removed the task by the time a callback runs, so a failure is only reported,
/// never retried, and the task is never re-inserted.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The callback reported a failure.
    #[error("callback failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The callback panicked; the payload was caught at the completion boundary.
    #[error("callback panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl CallbackError {
    /// Shorthand for [`CallbackError::Failed`].
    ///
    /// # Example
    /// ```
    /// use taskline::CallbackError;
    ///
    /// let err = CallbackError::fail("socket closed");
    /// assert_eq!(err.to_string(), "callback failed: socket closed");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        CallbackError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Failed { .. } => "callback_failed",
            CallbackError::Panicked { .. } => "callback_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Failed { error } => format!("error: {error}"),
            CallbackError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Converts a caught panic payload into [`CallbackError::Panicked`].
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        CallbackError::Panicked {
            info: panic_info(&*payload),
        }
    }
}

/// Extracts the text of a panic payload (`&str` or `String`).
pub(crate) fn panic_info(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(CallbackError::fail("x").as_label(), "callback_failed");
        assert_eq!(
            CallbackError::Panicked { info: "x".into() }.as_label(),
            "callback_panicked"
        );
        assert_eq!(
            RegistryError::NoRuntime { context: "timer" }.as_label(),
            "registry_no_runtime"
        );
    }

    #[test]
    fn test_from_panic_extracts_payload() {
        let err = CallbackError::from_panic(Box::new("boom"));
        assert_eq!(err, CallbackError::Panicked { info: "boom".into() });

        let err = CallbackError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err.as_message(), "panic: owned boom");

        let err = CallbackError::from_panic(Box::new(42u8));
        assert_eq!(err.as_message(), "panic: unknown panic");
    }

    #[test]
    fn test_panic_info_is_raw_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("queue full"));
        assert_eq!(panic_info(&*payload), "queue full");
    }
}
