//! The page driver: a sequence whose every value is a page of mixed items.
//!
//! Every item of a page is resolved through a [`Batch`] before the page is
//! counted or handed to the destination. Item failures are reported apart from
//! source and destination failures, as [`Failure::Data`].

use std::time::Duration;

use tokio::time::Instant;

use crate::batch::Batch;
use crate::failure::Failure;
use crate::mixed::{Mixed, Reason};
use crate::resolve::{resolve, resolve_with};
use crate::sequence::Pull;

/// Consumer of resolved pages: `(index, page, delay)`.
pub type PageDestination<'a, T> = Box<dyn FnMut(usize, &[T], Option<Duration>) -> Result<Mixed<()>, Reason> + 'a>;

pub struct PageOptions<'a, T> {
    destination: Option<PageDestination<'a, T>>,
    limit: usize,
}

impl<'a, T> PageOptions<'a, T> {
    pub fn new() -> Self {
        PageOptions { destination: None, limit: 0 }
    }

    pub fn destination<F>(mut self, destination: F) -> Self
    where
        F: FnMut(usize, &[T], Option<Duration>) -> Result<Mixed<()>, Reason> + 'a,
    {
        self.destination = Some(Box::new(destination));
        self
    }

    /// Stop after this many pages. `0` means no limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl<T> Default for PageOptions<'_, T> {
    fn default() -> Self {
        PageOptions::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub pages: usize,
    /// Items across all pages.
    pub total: usize,
    pub duration: Duration,
}

/// Run a page source until it produces `None` or `limit` pages have gone
/// through. The pull's `previous` is the last resolved page.
#[tracing::instrument(level = "debug", skip_all, fields(limit = options.limit))]
pub async fn page<T, S, B>(batch: &B, mut source: S, options: PageOptions<'_, T>) -> Result<PageSummary, Failure<Vec<T>>>
where
    T: 'static,
    S: FnMut(Pull<'_, Vec<T>>) -> Result<Mixed<Option<Vec<Mixed<T>>>>, Reason>,
    B: Batch,
{
    let PageOptions { mut destination, limit } = options;
    let started = Instant::now();
    let mut previous: Option<Vec<T>> = None;
    let mut last_pull: Option<Instant> = None;
    let mut last_push: Option<Instant> = None;
    let mut total = 0;
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
        let Some(items) = pulled.value else {
            tracing::debug!(pages = index, total, "source finished");
            break;
        };

        let values = match batch.resolve_all(items).await {
            Ok(values) => values,
            Err(data) => {
                tracing::debug!(index, failed = data.get_errors().len(), "page data failed");
                return Err(Failure::Data { index, data });
            }
        };
        tracing::trace!(index, size = values.len(), "page resolved");
        total += values.len();
        let mut delayed = pulled.delayed;

        if let Some(destination) = destination.as_mut() {
            let now = Instant::now();
            let delay = last_push.map(|at| now - at);
            last_push = Some(now);
            let pushed = match destination(index, &values, delay) {
                Ok(result) => resolve(result).await,
                Err(error) => Err(error),
            };
            match pushed {
                Ok(pushed) => delayed |= pushed.delayed,
                Err(error) => {
                    tracing::debug!(index, %error, "destination failed");
                    return Err(Failure::Dest { index, error, value: values });
                }
            }
        }

        previous = Some(values);
        index += 1;
        if index == limit {
            tracing::debug!(pages = index, total, "limit reached");
            break;
        }
        if !delayed {
            tokio::task::yield_now().await;
        }
    }

    Ok(PageSummary { pages: index, total, duration: started.elapsed() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Concurrent;
    use anyhow::anyhow;

    fn pages(data: Vec<Vec<u32>>) -> impl FnMut(Pull<'_, Vec<u32>>) -> Result<Mixed<Option<Vec<Mixed<u32>>>>, Reason> {
        move |pull| {
            let page = data.get(pull.index).map(|page| page.iter().copied().map(Mixed::value).collect());
            Ok(Mixed::value(page))
        }
    }

    #[tokio::test]
    async fn test_counts_pages_and_items() {
        let summary = page(&Concurrent, pages(vec![vec![1, 2], vec![3]]), PageOptions::new())
            .await
            .unwrap();
        assert_eq!((summary.pages, summary.total), (2, 3));
    }

    #[tokio::test]
    async fn test_limit() {
        let data = vec![vec![1], vec![2, 3], vec![4, 5, 6]];
        let summary = page(&Concurrent, pages(data), PageOptions::new().limit(2)).await.unwrap();
        assert_eq!((summary.pages, summary.total), (2, 3));
    }

    #[tokio::test]
    async fn test_empty_pages_still_count() {
        let summary = page(&Concurrent, pages(vec![vec![], vec![]]), PageOptions::new())
            .await
            .unwrap();
        assert_eq!((summary.pages, summary.total), (2, 0));
    }

    #[tokio::test]
    async fn test_destination_gets_resolved_pages() {
        let mut received = Vec::new();
        page(
            &Concurrent,
            |pull: Pull<'_, Vec<u32>>| {
                let page = match pull.index {
                    0 => Some(vec![Mixed::value(1), Mixed::resolved(2)]),
                    1 => Some(vec![Mixed::lazy(|| 3)]),
                    _ => None,
                };
                Ok(Mixed::value(page))
            },
            PageOptions::new().destination(|index, values: &[u32], _| {
                received.push((index, values.to_vec()));
                Ok(Mixed::value(()))
            }),
        )
        .await
        .unwrap();
        assert_eq!(received, vec![(0, vec![1, 2]), (1, vec![3])]);
    }

    #[tokio::test]
    async fn test_item_failure_is_data_failure() {
        let err = page(
            &Concurrent,
            |_: Pull<'_, Vec<u32>>| Ok(Mixed::value(Some(vec![Mixed::value(1), Mixed::rejected(anyhow!("bad row"))]))),
            PageOptions::new(),
        )
        .await
        .unwrap_err();

        assert!(!err.is_internal());
        assert_eq!(err.index(), 0);
        assert_eq!(err.get_error().to_string(), "bad row");
    }

    #[tokio::test]
    async fn test_source_failure_carries_previous_page() {
        let mut source = pages(vec![vec![4, 5]]);
        let err = page(
            &Concurrent,
            move |pull: Pull<'_, Vec<u32>>| {
                if pull.index == 1 {
                    return Err(anyhow!("gone"));
                }
                source(pull)
            },
            PageOptions::new(),
        )
        .await
        .unwrap_err();

        assert!(err.is_internal());
        match err {
            Failure::Source { index, value, .. } => {
                assert_eq!(index, 1);
                assert_eq!(value, Some(vec![4, 5]));
            }
            other => panic!("unexpected failure: {other}"),
        }
    }

    #[tokio::test]
    async fn test_destination_failure() {
        let err = page(
            &Concurrent,
            pages(vec![vec![1], vec![2]]),
            PageOptions::new().destination(|index, _: &[u32], _| {
                if index == 1 { Err(anyhow!("full")) } else { Ok(Mixed::value(())) }
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(&err, Failure::Dest { index: 1, value, .. } if value == &vec![2]));
    }
}
