use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{Chunk, Listener, ListenerId, PushSource, StreamEvent};
use crate::mixed::Reason;

/// In-memory push stream. Clones share the same buffer and listeners, so one
/// handle can be read while another one writes.
pub struct BufferedStream<C> {
    inner: Rc<RefCell<Inner<C>>>,
}

struct Inner<C> {
    buffer: VecDeque<C>,
    listeners: Vec<(StreamEvent, ListenerId, Listener)>,
    next_id: u64,
    error: Option<Reason>,
}

impl<C> Clone for BufferedStream<C> {
    fn clone(&self) -> Self {
        BufferedStream { inner: self.inner.clone() }
    }
}

impl<C: Chunk> Default for BufferedStream<C> {
    fn default() -> Self {
        BufferedStream::new()
    }
}

impl<C: Chunk> BufferedStream<C> {
    pub fn new() -> Self {
        BufferedStream {
            inner: Rc::new(RefCell::new(Inner {
                buffer: VecDeque::new(),
                listeners: Vec::new(),
                next_id: 0,
                error: None,
            })),
        }
    }

    /// Buffer a chunk without notifying anyone. Empty chunks are dropped.
    ///
    /// A reader picks the chunk up on its next drain: when it starts, on the
    /// next [`StreamEvent::Readable`], or before it honors the end of the
    /// stream.
    pub fn push(&self, chunk: C) {
        if !chunk.is_empty() {
            self.inner.borrow_mut().buffer.push_back(chunk);
        }
    }

    /// Buffer chunks, then announce them with [`StreamEvent::Readable`].
    pub fn write<I: IntoIterator<Item = C>>(&self, chunks: I) {
        for chunk in chunks {
            self.push(chunk);
        }
        self.emit(StreamEvent::Readable);
    }

    /// Remove every listener, whatever it was registered for.
    pub fn clear_listeners(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    /// Call every listener registered for `event`.
    pub fn emit(&self, event: StreamEvent) {
        // listeners may register or remove listeners themselves
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(registered, _, _)| *registered == event)
            .map(|(_, _, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Break the stream with `reason`.
    pub fn fail(&self, reason: impl Into<Reason>) {
        self.inner.borrow_mut().error = Some(reason.into());
        self.emit(StreamEvent::Error);
    }

    /// End the stream, then close it.
    pub fn finish(&self) {
        self.emit(StreamEvent::End);
        self.emit(StreamEvent::Close);
    }

    /// Number of chunks waiting to be read.
    pub fn buffered(&self) -> usize {
        self.inner.borrow().buffer.len()
    }
}

impl<C: Chunk> PushSource for BufferedStream<C> {
    type Chunk = C;

    fn on(&self, event: StreamEvent, listener: Listener) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((event, id, listener));
        id
    }

    fn off(&self, event: StreamEvent, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(registered, listener_id, _)| !(*registered == event && *listener_id == id));
        inner.listeners.len() != before
    }

    fn listener_count(&self, event: StreamEvent) -> usize {
        self.inner.borrow().listeners.iter().filter(|(registered, _, _)| *registered == event).count()
    }

    fn read(&self, size: Option<usize>) -> Option<C> {
        let mut inner = self.inner.borrow_mut();
        match size {
            None => inner.buffer.pop_front(),
            Some(size) => {
                let front = inner.buffer.front_mut()?;
                if front.len() <= size {
                    return inner.buffer.pop_front();
                }
                let chunk = front.split_to(size);
                // a split may round up and take the whole chunk
                if front.is_empty() {
                    inner.buffer.pop_front();
                }
                Some(chunk)
            }
        }
    }

    fn take_error(&self) -> Option<Reason> {
        self.inner.borrow_mut().error.take()
    }
}
