//! # Spex: asynchronous pull loops
//!
//! Drive a source of values one item at a time, hand each item to a consumer,
//! and never ask for the next one before the consumer is done with the
//! current one.
//!
//! ## Mixed values
//!
//! Sources and consumers return a [`Mixed<T>`]: a plain value, a callable, a
//! suspendable computation or a future. [`resolve`] reduces any of them to the
//! concrete value and reports whether that took a suspension.
//!
//! Suspendable computations are continuations. A [`Sans<I, O>`] receives input
//! and either yields an output or completes; an [`InitSans<I, O>`] yields its
//! first output before receiving anything. Built with [`build`], they yield the
//! mixed values they want to wait on and are resumed with what those resolved
//! to.
//!
//! ## Drivers
//!
//! - [`sequence`] pulls values until the source returns `None`
//! - [`page`] pulls pages of mixed items and resolves each page through a [`Batch`]
//! - [`read`] drains a [`PushSource`] into a receiver, one batch at a time
//!
//! [`Spex`] bundles the batch operation and the [`Config`] defaults.
//!
//! ## Example
//!
//! ```
//! # tokio_test::block_on(async {
//! use spex::prelude::*;
//!
//! let mut seen = Vec::new();
//! let output = sequence(
//!     |pull: Pull<'_, u32>| {
//!         let next = pull.previous.map_or(1, |previous| previous * 2);
//!         Ok(Mixed::resolved((next < 100).then_some(next)))
//!     },
//!     SequenceOptions::new().destination(|_, value: &u32, _| {
//!         seen.push(*value);
//!         Ok(Mixed::value(()))
//!     }),
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(output.total(), 7);
//! assert_eq!(seen, vec![1, 2, 4, 8, 16, 32, 64]);
//! # });
//! ```

pub mod batch;
pub mod build;
pub mod config;
pub mod failure;
pub mod generator;
mod init;
pub mod mixed;
pub mod page;
pub mod prelude;
pub mod resolve;
mod sans;
pub mod sequence;
mod spex;
mod step;
pub mod stream;

pub use batch::{Batch, BatchError, BatchFailure, Concurrent};
pub use crate::config::{Config, ConfigError};
pub use failure::Failure;
pub use generator::Suspendable;
pub use init::*;
pub use mixed::{Mixed, Reason, Resume};
pub use page::{PageOptions, PageSummary, page};
pub use resolve::{Resolved, resolve, resolve_with};
pub use sans::*;
pub use sequence::{Pull, SequenceOptions, SequenceOutput, sequence};
pub use spex::Spex;
pub use step::*;
pub use stream::{BufferedStream, Chunk, PushSource, ReadOptions, ReadSummary, StreamEvent, read};
