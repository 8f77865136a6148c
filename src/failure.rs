//! Rejections of the sequence and page drivers.
//!
//! A [`Failure`] says where a loop broke: in the source, in the destination, or
//! (for pages) in one of the items of a batch. [`Failure::get_error`] digs out
//! the underlying reason the same way for all three.

use std::error::Error;
use std::fmt;

use crate::batch::BatchError;
use crate::mixed::Reason;

#[derive(Debug)]
pub enum Failure<T> {
    /// The source failed. `value` is what the failing pull was handed as the
    /// previous value.
    Source {
        index: usize,
        error: Reason,
        value: Option<T>,
    },
    /// The destination failed while processing `value`.
    Dest { index: usize, error: Reason, value: T },
    /// Items of a page failed to resolve.
    Data { index: usize, data: BatchError },
}

impl<T> Failure<T> {
    pub fn index(&self) -> usize {
        match self {
            Failure::Source { index, .. } | Failure::Dest { index, .. } | Failure::Data { index, .. } => {
                *index
            }
        }
    }

    /// The underlying reason. For a batch failure, the reason of its first item.
    pub fn get_error(&self) -> &Reason {
        match self {
            Failure::Source { error, .. } | Failure::Dest { error, .. } => error,
            Failure::Data { data, .. } => &data.first().reason,
        }
    }

    /// Caused by the source or destination rather than by page data.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Failure::Data { .. })
    }

    pub fn into_error(self) -> Reason {
        match self {
            Failure::Source { error, .. } | Failure::Dest { error, .. } => error,
            Failure::Data { data, .. } => data.into(),
        }
    }
}

impl<T> fmt::Display for Failure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Source { index, error, .. } => {
                write!(f, "source failed at index {index}: {error}")
            }
            Failure::Dest { index, error, .. } => {
                write!(f, "destination failed at index {index}: {error}")
            }
            Failure::Data { index, data } => write!(f, "page {index} failed: {data}"),
        }
    }
}

impl<T: fmt::Debug> Error for Failure<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Failure::Source { error, .. } | Failure::Dest { error, .. } => Some(&**error),
            Failure::Data { data, .. } => Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchFailure;
    use anyhow::anyhow;

    fn batch_error() -> BatchError {
        let failures = vec![
            BatchFailure { index: 1, reason: anyhow!("bad item") },
            BatchFailure { index: 4, reason: anyhow!("worse item") },
        ];
        BatchError::from_failures(failures, 5).unwrap()
    }

    #[test]
    fn test_get_error_is_uniform() {
        let source: Failure<u32> = Failure::Source { index: 2, error: anyhow!("pull"), value: Some(1) };
        let dest: Failure<u32> = Failure::Dest { index: 3, error: anyhow!("push"), value: 9 };
        let data: Failure<u32> = Failure::Data { index: 0, data: batch_error() };

        assert_eq!(source.get_error().to_string(), "pull");
        assert_eq!(dest.get_error().to_string(), "push");
        assert_eq!(data.get_error().to_string(), "bad item");
    }

    #[test]
    fn test_internal_and_normal() {
        let source: Failure<u32> = Failure::Source { index: 0, error: anyhow!("x"), value: None };
        let data: Failure<u32> = Failure::Data { index: 7, data: batch_error() };

        assert!(source.is_internal());
        assert!(!data.is_internal());
        assert_eq!(data.index(), 7);
    }

    #[test]
    fn test_display_and_source_chain() {
        let dest: Failure<&str> = Failure::Dest { index: 5, error: anyhow!("disk full"), value: "row" };
        assert_eq!(dest.to_string(), "destination failed at index 5: disk full");
        assert_eq!(dest.source().unwrap().to_string(), "disk full");

        let data: Failure<&str> = Failure::Data { index: 1, data: batch_error() };
        assert_eq!(data.to_string(), "page 1 failed: 2 of 5 batch items failed");
        assert!(data.into_error().downcast_ref::<BatchError>().is_some());
    }
}
