//! The drivers behind one value that carries their shared dependencies.

use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::batch::{Batch, BatchError, Concurrent};
use crate::config::Config;
use crate::failure::Failure;
use crate::mixed::{Mixed, Reason};
use crate::page::{PageOptions, PageSummary, page};
use crate::sequence::{Pull, SequenceOptions, SequenceOutput, sequence};
use crate::stream::{PushSource, ReadOptions, ReadSummary, read};

/// Bundles the batch operation used for pages with configured defaults.
///
/// ```rust
/// # tokio_test::block_on(async {
/// use spex::{Config, Mixed, Pull, Spex};
///
/// let config = Config::from_toml_str("[sequence]\nlimit = 2").unwrap();
/// let spex = Spex::new().with_config(config);
/// let output = spex
///     .sequence(|pull: Pull<'_, usize>| Ok(Mixed::value(Some(pull.index))), spex.sequence_options())
///     .await
///     .unwrap();
/// assert_eq!(output.total(), 2);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Spex<B = Concurrent> {
    batch: B,
    config: Config,
}

impl Spex {
    pub fn new() -> Self {
        Spex::default()
    }
}

impl<B: Batch> Spex<B> {
    /// Swap the batch operation used by [`Spex::page`] and [`Spex::batch`].
    pub fn with_batch<N: Batch>(self, batch: N) -> Spex<N> {
        Spex { batch, config: self.config }
    }

    pub fn with_config(self, config: Config) -> Self {
        Spex { config, ..self }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sequence_options<'a, T>(&self) -> SequenceOptions<'a, T> {
        SequenceOptions::new().limit(self.config.sequence.limit).track(self.config.sequence.track)
    }

    pub fn page_options<'a, T>(&self) -> PageOptions<'a, T> {
        PageOptions::new().limit(self.config.page.limit)
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions::new().closable(self.config.stream.closable).read_size(self.config.stream.read_size)
    }

    /// See [`sequence`].
    pub async fn sequence<T, S>(&self, source: S, options: SequenceOptions<'_, T>) -> Result<SequenceOutput<T>, Failure<T>>
    where
        T: Clone + 'static,
        S: FnMut(Pull<'_, T>) -> Result<Mixed<Option<T>>, Reason>,
    {
        sequence(source, options).await
    }

    /// See [`page`]. Pages are resolved with this context's batch operation.
    pub async fn page<T, S>(&self, source: S, options: PageOptions<'_, T>) -> Result<PageSummary, Failure<Vec<T>>>
    where
        T: 'static,
        S: FnMut(Pull<'_, Vec<T>>) -> Result<Mixed<Option<Vec<Mixed<T>>>>, Reason>,
    {
        page(&self.batch, source, options).await
    }

    /// See [`read`].
    pub async fn read<S, R>(&self, stream: &S, receiver: R, options: ReadOptions) -> Result<ReadSummary, Reason>
    where
        S: PushSource + ?Sized,
        R: FnMut(usize, Vec<S::Chunk>, Option<Duration>) -> Result<Mixed<()>, Reason>,
    {
        read(stream, receiver, options).await
    }

    pub fn batch<T: 'static>(&self, items: Vec<Mixed<T>>) -> LocalBoxFuture<'static, Result<Vec<T>, BatchError>> {
        self.batch.resolve_all(items)
    }
}
