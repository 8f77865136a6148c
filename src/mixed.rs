//! Mixed values: what a source hands back before it is a plain value.
//!
//! A [`Mixed<T>`] is either the value itself, a callable that produces another
//! mixed value, a suspendable computation, or a future of another mixed value.
//! The constructors on [`Mixed`] are the adapter between arbitrary futures and
//! error types and the single representation the drivers understand.

use std::fmt;
use std::future::{Future, ready};

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::generator::Suspendable;
use crate::init::InitSans;
use crate::sans::Sans;

/// Opaque reason carried by every rejection.
pub type Reason = anyhow::Error;

/// What a suspendable computation receives back for each value it yielded.
pub type Resume<T> = Result<T, Reason>;

/// A value that may still need calling, driving or awaiting.
pub enum Mixed<T> {
    Value(T),
    Callable(Box<dyn FnOnce() -> Result<Mixed<T>, Reason>>),
    Suspendable(Suspendable<T>),
    Deferred(LocalBoxFuture<'static, Result<Mixed<T>, Reason>>),
}

impl<T: 'static> Mixed<T> {
    /// A concrete value.
    pub fn value(value: T) -> Self {
        Mixed::Value(value)
    }

    /// A lazy producer. An `Err` is a synchronous failure.
    pub fn call<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<Mixed<T>, Reason> + 'static,
    {
        Mixed::Callable(Box::new(f))
    }

    /// A lazy producer that cannot fail.
    pub fn lazy<F>(f: F) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        Mixed::Callable(Box::new(move || Ok(Mixed::Value(f()))))
    }

    /// A future of a concrete value.
    ///
    /// ```rust
    /// use spex::Mixed;
    ///
    /// let later: Mixed<u32> = Mixed::deferred(async { Ok(7) });
    /// assert!(!later.is_value());
    /// ```
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, Reason>> + 'static,
    {
        Mixed::Deferred(future.map(|outcome| outcome.map(Mixed::Value)).boxed_local())
    }

    /// A future of another mixed value.
    pub fn deferred_mixed<F>(future: F) -> Self
    where
        F: Future<Output = Result<Mixed<T>, Reason>> + 'static,
    {
        Mixed::Deferred(future.boxed_local())
    }

    /// Adapts a future with any error type convertible into a [`Reason`].
    pub fn from_future<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + 'static,
        E: Into<Reason>,
    {
        Mixed::Deferred(
            future
                .map(|outcome| outcome.map(Mixed::Value).map_err(Into::into))
                .boxed_local(),
        )
    }

    /// An already settled future. Resolving it still counts as a suspension.
    pub fn resolved(value: T) -> Self {
        Mixed::Deferred(ready(Ok(Mixed::Value(value))).boxed_local())
    }

    /// An already rejected future.
    pub fn rejected(reason: impl Into<Reason>) -> Self {
        Mixed::Deferred(ready(Err(reason.into())).boxed_local())
    }

    /// A suspendable computation: it yields mixed values to wait on and is
    /// resumed with what each of them resolved to.
    pub fn suspend<S>(stage: S) -> Self
    where
        S: InitSans<Resume<T>, Mixed<T>> + 'static,
        S::Next: Sans<Resume<T>, Mixed<T>, Return = Result<Mixed<T>, Reason>> + 'static,
    {
        Mixed::Suspendable(Suspendable::new(stage))
    }
}

impl<T> Mixed<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Mixed::Value(_))
    }
}

impl<T> From<T> for Mixed<T> {
    fn from(value: T) -> Self {
        Mixed::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Mixed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mixed::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Mixed::Callable(_) => f.write_str("Callable(..)"),
            Mixed::Suspendable(_) => f.write_str("Suspendable(..)"),
            Mixed::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
