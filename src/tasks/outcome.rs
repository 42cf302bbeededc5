//! # Result delivered to a completion callback.
//!
//! [`Outcome`] keeps the two ways a task can finish apart:
//! - [`Outcome::Success`] an explicit [`complete`](crate::TaskRegistry::complete) with a value;
//! - [`Outcome::Expired`] the task's timeout elapsed first.
//!
//! Cancellation has no outcome: a cancelled task's callback is dropped unrun.
//!
//! Producers that prefer a plain "default value on timeout" can collapse the
//! variant with [`Outcome::unwrap_or_default`].

/// How a task finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<O> {
    /// Explicit response from the worker.
    Success(O),
    /// Timeout elapsed before any response arrived.
    Expired,
}

impl<O> Outcome<O> {
    /// Returns `true` if the task timed out.
    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self, Outcome::Expired)
    }

    /// Returns `true` if the task was answered explicitly.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Converts into the response value, if any.
    #[inline]
    pub fn success(self) -> Option<O> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Expired => None,
        }
    }

    /// Maps the response value, keeping `Expired` as is.
    pub fn map<U>(self, f: impl FnOnce(O) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Expired => Outcome::Expired,
        }
    }

    /// Returns the response value, or `O::default()` when expired.
    ///
    /// # Example
    /// ```
    /// use taskline::Outcome;
    ///
    /// assert_eq!(Outcome::Success(3u32).unwrap_or_default(), 3);
    /// assert_eq!(Outcome::<String>::Expired.unwrap_or_default(), "");
    /// ```
    pub fn unwrap_or_default(self) -> O
    where
        O: Default,
    {
        self.success().unwrap_or_default()
    }
}

impl<O> From<O> for Outcome<O> {
    fn from(value: O) -> Self {
        Outcome::Success(value)
    }
}
