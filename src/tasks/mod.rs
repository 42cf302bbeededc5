//! # Per-task value types.
//!
//! - [`Outcome`] what a completion callback receives (`Success` / `Expired`)
//! - [`Completion`] the boxed callback stored in a task record

mod completion;
mod outcome;

pub(crate) use completion::run_completion;
pub use completion::Completion;
pub use outcome::Outcome;
