//! Resolving a whole page of mixed values at once.

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use thiserror::Error;

use crate::mixed::{Mixed, Reason};
use crate::resolve::resolve;

/// Resolves a list of mixed values concurrently, all or nothing.
pub trait Batch {
    /// Resolves every item, keeping their order. Fails with every item failure
    /// if any item fails.
    fn resolve_all<T: 'static>(
        &self,
        items: Vec<Mixed<T>>,
    ) -> LocalBoxFuture<'static, Result<Vec<T>, BatchError>>;
}

/// One failed item of a batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub reason: Reason,
}

/// Every failure of a batch. Never empty.
#[derive(Debug, Error)]
#[error("{} of {} batch items failed", .failures.len(), .total)]
pub struct BatchError {
    failures: Vec<BatchFailure>,
    total: usize,
}

impl BatchError {
    /// `None` when there is nothing to report.
    pub fn from_failures(failures: Vec<BatchFailure>, total: usize) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(BatchError { failures, total })
        }
    }

    pub fn get_errors(&self) -> &[BatchFailure] {
        &self.failures
    }

    pub fn first(&self) -> &BatchFailure {
        &self.failures[0]
    }

    /// Size of the batch, failed items included.
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Resolves every item at the same time, without any throttling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Concurrent;

impl Batch for Concurrent {
    fn resolve_all<T: 'static>(
        &self,
        items: Vec<Mixed<T>>,
    ) -> LocalBoxFuture<'static, Result<Vec<T>, BatchError>> {
        let total = items.len();
        let pending = join_all(items.into_iter().map(resolve));
        async move {
            let mut values = Vec::with_capacity(total);
            let mut failures = Vec::new();
            for (index, outcome) in pending.await.into_iter().enumerate() {
                match outcome {
                    Ok(resolved) => values.push(resolved.value),
                    Err(reason) => failures.push(BatchFailure { index, reason }),
                }
            }
            match BatchError::from_failures(failures, total) {
                Some(err) => Err(err),
                None => Ok(values),
            }
        }
        .boxed_local()
    }
}
