//! Reading push streams through the pull loop.
//!
//! A [`PushSource`] notifies listeners when data is buffered and when it ends
//! or breaks. [`read`] turns those notifications into receiver calls that
//! never overlap: the buffer is drained again only once the previous batch has
//! been fully processed.

mod buffered;
mod read;

use std::rc::Rc;

pub use buffered::BufferedStream;
pub use read::{ReadOptions, ReadSummary, StreamError, read};

use crate::mixed::Reason;

/// Notifications a push source emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamEvent {
    /// New data can be read.
    Readable,
    /// No more data will arrive.
    End,
    /// The underlying resource was released.
    Close,
    /// The stream broke; [`PushSource::take_error`] says why.
    Error,
}

impl StreamEvent {
    pub const ALL: [StreamEvent; 4] = [StreamEvent::Readable, StreamEvent::End, StreamEvent::Close, StreamEvent::Error];
}

/// Handle returned by [`PushSource::on`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Listener = Rc<dyn Fn()>;

/// A readable stream that pushes notifications and buffers data until read.
pub trait PushSource {
    type Chunk: Chunk;

    fn on(&self, event: StreamEvent, listener: Listener) -> ListenerId;

    /// Returns `false` if no such listener was registered.
    fn off(&self, event: StreamEvent, id: ListenerId) -> bool;

    fn listener_count(&self, event: StreamEvent) -> usize;

    /// Take buffered data: everything in the next chunk with `None`, at most
    /// `size` units otherwise. `None` once the buffer is empty.
    fn read(&self, size: Option<usize>) -> Option<Self::Chunk>;

    /// The reason behind the last [`StreamEvent::Error`], if any.
    fn take_error(&self) -> Option<Reason>;
}

/// A piece of stream data with a measurable length.
pub trait Chunk: Sized {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split off and return the first `at` units, keeping the rest.
    fn split_to(&mut self, at: usize) -> Self;
}

impl<T> Chunk for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn split_to(&mut self, at: usize) -> Self {
        let rest = self.split_off(at.min(Vec::len(self)));
        std::mem::replace(self, rest)
    }
}

/// Lengths are in bytes. A split never cuts a character in half; it moves
/// forward to the next boundary instead.
impl Chunk for String {
    fn len(&self) -> usize {
        String::len(self)
    }

    fn split_to(&mut self, at: usize) -> Self {
        let mut at = at.min(String::len(self));
        while !self.is_char_boundary(at) {
            at += 1;
        }
        let rest = self.split_off(at);
        std::mem::replace(self, rest)
    }
}
