//! The sequence driver: pull values one at a time until the source runs dry.
//!
//! Each iteration resolves whatever the source produced, hands the value to the
//! optional destination and waits for the destination to settle before the
//! next pull. A source returns `None` to finish.
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use spex::{Mixed, Pull, SequenceOptions, sequence};
//!
//! let output = sequence(
//!     |pull: Pull<'_, u32>| Ok(Mixed::value((pull.index < 3).then_some(pull.index as u32))),
//!     SequenceOptions::new().track(true),
//! )
//! .await
//! .unwrap();
//! assert_eq!(output.values(), Some(&[0, 1, 2][..]));
//! # });
//! ```

use std::time::Duration;

use tokio::time::Instant;

use crate::failure::Failure;
use crate::mixed::{Mixed, Reason};
use crate::resolve::{resolve, resolve_with};

/// What a source sees on every pull.
#[derive(Debug)]
pub struct Pull<'a, T> {
    /// Number of values produced so far.
    pub index: usize,
    /// The last value produced, `None` on the first pull.
    pub previous: Option<&'a T>,
    /// Time since the previous pull, `None` on the first pull.
    pub delay: Option<Duration>,
}

impl<T> Clone for Pull<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Pull<'_, T> {}

/// Consumer of sequence values: `(index, value, delay)`.
pub type Destination<'a, T> = Box<dyn FnMut(usize, &T, Option<Duration>) -> Result<Mixed<()>, Reason> + 'a>;

pub struct SequenceOptions<'a, T> {
    destination: Option<Destination<'a, T>>,
    limit: usize,
    track: bool,
}

impl<'a, T> SequenceOptions<'a, T> {
    pub fn new() -> Self {
        SequenceOptions { destination: None, limit: 0, track: false }
    }

    /// Called with each value. The next pull waits until its result resolves.
    pub fn destination<F>(mut self, destination: F) -> Self
    where
        F: FnMut(usize, &T, Option<Duration>) -> Result<Mixed<()>, Reason> + 'a,
    {
        self.destination = Some(Box::new(destination));
        self
    }

    /// Stop after this many values. `0` means no limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Keep every value and return them instead of a count.
    pub fn track(mut self, track: bool) -> Self {
        self.track = track;
        self
    }
}

impl<T> Default for SequenceOptions<'_, T> {
    fn default() -> Self {
        SequenceOptions::new()
    }
}

/// Result of a finished sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutput<T> {
    Summary { total: usize, duration: Duration },
    Tracked { values: Vec<T>, duration: Duration },
}

impl<T> SequenceOutput<T> {
    /// Number of values produced.
    pub fn total(&self) -> usize {
        match self {
            SequenceOutput::Summary { total, .. } => *total,
            SequenceOutput::Tracked { values, .. } => values.len(),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            SequenceOutput::Summary { duration, .. } | SequenceOutput::Tracked { duration, .. } => *duration,
        }
    }

    pub fn values(&self) -> Option<&[T]> {
        match self {
            SequenceOutput::Summary { .. } => None,
            SequenceOutput::Tracked { values, .. } => Some(values),
        }
    }

    pub fn into_values(self) -> Option<Vec<T>> {
        match self {
            SequenceOutput::Summary { .. } => None,
            SequenceOutput::Tracked { values, .. } => Some(values),
        }
    }
}

/// Run a source until it produces `None` or `limit` values have gone through.
///
/// A source failure rejects with [`Failure::Source`] carrying the value the
/// failing pull was handed. A destination failure rejects with
/// [`Failure::Dest`] carrying the value it was processing.
#[tracing::instrument(level = "debug", skip_all, fields(limit = options.limit, track = options.track))]
pub async fn sequence<T, S>(mut source: S, options: SequenceOptions<'_, T>) -> Result<SequenceOutput<T>, Failure<T>>
where
    T: Clone + 'static,
    S: FnMut(Pull<'_, T>) -> Result<Mixed<Option<T>>, Reason>,
{
    let SequenceOptions { mut destination, limit, track } = options;
    let started = Instant::now();
    let mut tracked = Vec::new();
    let mut previous: Option<T> = None;
    let mut last_pull: Option<Instant> = None;
    let mut last_push: Option<Instant> = None;
    let mut index = 0;

    loop {
        let now = Instant::now();
        let pull = Pull {
            index,
            previous: previous.as_ref(),
            delay: last_pull.map(|at| now - at),
        };
        last_pull = Some(now);

        let pulled = match resolve_with(&mut source, pull).await {
            Ok(pulled) => pulled,
            Err(error) => {
                tracing::debug!(index, %error, "source failed");
                return Err(Failure::Source { index, error, value: previous });
            }
        };
        let Some(value) = pulled.value else {
            tracing::debug!(total = index, "source finished");
            break;
        };
        tracing::trace!(index, delayed = pulled.delayed, "pulled");
        let mut delayed = pulled.delayed;

        if track {
            tracked.push(value.clone());
        }

        if let Some(destination) = destination.as_mut() {
            let now = Instant::now();
            let delay = last_push.map(|at| now - at);
            last_push = Some(now);
            let pushed = match destination(index, &value, delay) {
                Ok(result) => resolve(result).await,
                Err(error) => Err(error),
            };
            match pushed {
                Ok(pushed) => delayed |= pushed.delayed,
                Err(error) => {
                    tracing::debug!(index, %error, "destination failed");
                    return Err(Failure::Dest { index, error, value });
                }
            }
        }

        previous = Some(value);
        index += 1;
        if index == limit {
            tracing::debug!(total = index, "limit reached");
            break;
        }
        if !delayed {
            tokio::task::yield_now().await;
        }
    }

    let duration = started.elapsed();
    Ok(if track {
        SequenceOutput::Tracked { values: tracked, duration }
    } else {
        SequenceOutput::Summary { total: index, duration }
    })
}
