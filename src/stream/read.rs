use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::Instant;

use super::{Chunk, ListenerId, PushSource, StreamEvent};
use crate::mixed::{Mixed, Reason};
use crate::resolve::resolve;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream emitted an error without a reason")]
    Unspecified,
    #[error("stream listeners were removed while reading")]
    Detached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Finish on [`StreamEvent::Close`] instead of [`StreamEvent::End`].
    pub closable: bool,
    /// Read at most this many units per chunk. `None` reads whole chunks.
    pub read_size: Option<usize>,
}

impl ReadOptions {
    pub fn new() -> Self {
        ReadOptions::default()
    }

    /// Finish on [`StreamEvent::Close`] instead of [`StreamEvent::End`].
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// Read at most this many units per chunk. `0` reads whole chunks.
    pub fn read_size(mut self, read_size: usize) -> Self {
        self.read_size = (read_size > 0).then_some(read_size);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    /// Receiver calls.
    pub calls: usize,
    /// Chunks read from the stream.
    pub reads: usize,
    /// Total length of those chunks.
    pub length: usize,
    pub duration: Duration,
}

/// Listener registrations of one [`read`]. Dropping it removes them all.
struct Session<'s, S: PushSource + ?Sized> {
    stream: &'s S,
    listeners: Vec<(StreamEvent, ListenerId)>,
}

impl<'s, S: PushSource + ?Sized> Session<'s, S> {
    fn attach(stream: &'s S) -> (Self, UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = unbounded_channel();
        let listeners = StreamEvent::ALL
            .into_iter()
            .map(|event| {
                let tx = tx.clone();
                let id = stream.on(
                    event,
                    Rc::new(move || {
                        // the reader is gone once the receiving half is closed
                        let _ = tx.send(event);
                    }),
                );
                (event, id)
            })
            .collect();
        (Session { stream, listeners }, rx)
    }
}

impl<S: PushSource + ?Sized> Drop for Session<'_, S> {
    fn drop(&mut self) {
        for (event, id) in self.listeners.drain(..) {
            self.stream.off(event, id);
        }
    }
}

/// Read a push stream, handing every drained batch of chunks to `receiver`.
///
/// The receiver gets `(call_index, chunks, delay)` where `delay` is the time
/// since its previous call. The stream is drained again only after the
/// receiver's result resolves. Reading succeeds on [`StreamEvent::End`], or on
/// [`StreamEvent::Close`] when the options say the stream is closable, and
/// fails on [`StreamEvent::Error`] or when the receiver fails.
///
/// The stream is drained once right after the listeners are attached, so data
/// buffered before the call is not lost, and again before the finishing event
/// is honored, so data pushed without a [`StreamEvent::Readable`] still
/// reaches the receiver. Every listener is removed before this returns, and
/// when the returned future is dropped.
#[tracing::instrument(level = "debug", skip_all, fields(closable = options.closable, read_size = ?options.read_size))]
pub async fn read<S, R>(stream: &S, receiver: R, options: ReadOptions) -> Result<ReadSummary, Reason>
where
    S: PushSource + ?Sized,
    R: FnMut(usize, Vec<S::Chunk>, Option<Duration>) -> Result<Mixed<()>, Reason>,
{
    let (_session, events) = Session::attach(stream);
    let mut reader = Reader {
        stream,
        receiver,
        events,
        backlog: VecDeque::new(),
        read_size: options.read_size.filter(|size| *size > 0),
        last_call: None,
        calls: 0,
        reads: 0,
        length: 0,
    };
    let started = Instant::now();
    reader.drain().await?;

    loop {
        match reader.next_event().await? {
            StreamEvent::Readable => reader.drain().await?,
            StreamEvent::End if !options.closable => {
                reader.drain().await?;
                break;
            }
            StreamEvent::Close if options.closable => {
                reader.drain().await?;
                break;
            }
            StreamEvent::End | StreamEvent::Close => {}
            StreamEvent::Error => return Err(reader.stream_error()),
        }
    }

    tracing::debug!(calls = reader.calls, reads = reader.reads, length = reader.length, "stream finished");
    Ok(ReadSummary {
        calls: reader.calls,
        reads: reader.reads,
        length: reader.length,
        duration: started.elapsed(),
    })
}

struct Reader<'s, S: PushSource + ?Sized, R> {
    stream: &'s S,
    receiver: R,
    events: UnboundedReceiver<StreamEvent>,
    /// Events that arrived while the receiver was busy.
    backlog: VecDeque<StreamEvent>,
    read_size: Option<usize>,
    last_call: Option<Instant>,
    calls: usize,
    reads: usize,
    length: usize,
}

impl<S, R> Reader<'_, S, R>
where
    S: PushSource + ?Sized,
    R: FnMut(usize, Vec<S::Chunk>, Option<Duration>) -> Result<Mixed<()>, Reason>,
{
    async fn next_event(&mut self) -> Result<StreamEvent, Reason> {
        if let Some(event) = self.backlog.pop_front() {
            return Ok(event);
        }
        match self.events.recv().await {
            Some(event) => Ok(event),
            None => Err(StreamError::Detached.into()),
        }
    }

    fn stream_error(&self) -> Reason {
        let error = self.stream.take_error().unwrap_or_else(|| StreamError::Unspecified.into());
        tracing::debug!(%error, "stream failed");
        error
    }

    /// Hand everything buffered to the receiver, batch after batch, until a
    /// drain comes back empty.
    async fn drain(&mut self) -> Result<(), Reason> {
        loop {
            let mut batch = Vec::new();
            while let Some(chunk) = self.stream.read(self.read_size) {
                self.reads += 1;
                self.length += chunk.len();
                batch.push(chunk);
            }
            if batch.is_empty() {
                return Ok(());
            }

            let now = Instant::now();
            let delay = self.last_call.map(|at| now - at);
            self.last_call = Some(now);
            let index = self.calls;
            self.calls += 1;
            tracing::trace!(index, chunks = batch.len(), "receiving");

            let result = (self.receiver)(index, batch, delay).inspect_err(|error| {
                tracing::debug!(index, %error, "receiver failed");
            })?;
            self.settle(result).await?;
        }
    }

    /// Wait for a receiver result. Stream errors still abort at once; any other
    /// notification is kept for later.
    async fn settle(&mut self, result: Mixed<()>) -> Result<(), Reason> {
        if result.is_value() {
            return Ok(());
        }
        let mut pending = resolve(result);
        loop {
            tokio::select! {
                biased;
                settled = &mut pending => {
                    return settled.map(|_| ()).inspect_err(|error| {
                        tracing::debug!(%error, "receiver result rejected");
                    });
                }
                event = self.events.recv() => match event {
                    Some(StreamEvent::Error) => return Err(self.stream_error()),
                    Some(event) => self.backlog.push_back(event),
                    None => return Err(StreamError::Detached.into()),
                },
            }
        }
    }
}
