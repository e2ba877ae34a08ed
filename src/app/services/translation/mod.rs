//! Translation entry points
//!
//! Ties the readers, grouping and writers together. The input side turns a
//! bundle of DSSAT text files into a [`Dataset`](crate::app::models::Dataset);
//! the output side schedules one writer task per output artifact and collects
//! the files they produce.
//!
//! ## Architecture
//!
//! - [`input`] - [`InputBundle`] and [`DssatInput`]
//! - [`output`] - [`OutputController`] driving the writers through the
//!   [`WriteScheduler`](crate::app::services::scheduler::WriteScheduler)

pub mod input;
pub mod output;

#[cfg(test)]
pub mod tests;

pub use input::{DssatInput, InputBundle};
pub use output::OutputController;
