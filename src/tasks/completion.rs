//! # Completion callbacks.
//!
//! A [`Completion`] is the boxed `FnOnce` stored in each task record. It is
//! moved out of the registry exactly once, after the record is removed and the
//! registry lock is released, and run by [`run_completion`], which turns both
//! returned errors and panics into a [`CallbackError`].

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::CallbackError;
use crate::tasks::Outcome;

/// Boxed completion callback owned by a task record.
pub type Completion<O> = Box<dyn FnOnce(Outcome<O>) -> Result<(), CallbackError> + Send + 'static>;

/// Runs a completion callback, catching panics at the boundary.
pub(crate) fn run_completion<O>(f: Completion<O>, outcome: Outcome<O>) -> Result<(), CallbackError> {
    match catch_unwind(AssertUnwindSafe(move || f(outcome))) {
        Ok(res) => res,
        Err(payload) => Err(CallbackError::from_panic(payload)),
    }
}
