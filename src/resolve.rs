//! Reducing a mixed value to the concrete value it stands for.

use futures::FutureExt;
use futures::future::{LocalBoxFuture, ready};

use crate::generator;
use crate::mixed::{Mixed, Reason};

/// A concrete value together with whether getting it required a suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    /// `false` when everything happened synchronously in the calling frame.
    pub delayed: bool,
}

/// Resolve a mixed value.
///
/// Callables are invoked, suspendable computations are driven and futures are
/// awaited, over and over, until a plain value comes out or something fails.
/// Nested callables are unwrapped in a loop, never by recursion.
///
/// ```rust
/// # tokio_test::block_on(async {
/// use spex::{Mixed, resolve};
///
/// let resolved = resolve(Mixed::value(5)).await.unwrap();
/// assert_eq!((resolved.value, resolved.delayed), (5, false));
///
/// let resolved = resolve(Mixed::lazy(|| 6)).await.unwrap();
/// assert_eq!((resolved.value, resolved.delayed), (6, false));
///
/// let resolved = resolve(Mixed::deferred(async { Ok(7) })).await.unwrap();
/// assert_eq!((resolved.value, resolved.delayed), (7, true));
/// # });
/// ```
pub fn resolve<T: 'static>(
    value: Mixed<T>,
) -> LocalBoxFuture<'static, Result<Resolved<T>, Reason>> {
    async move {
        let mut delayed = false;
        let mut current = value;
        loop {
            current = match current {
                Mixed::Value(value) => return Ok(Resolved { value, delayed }),
                Mixed::Callable(f) => f()?,
                Mixed::Suspendable(suspendable) => {
                    delayed = true;
                    generator::drive(suspendable).await?
                }
                Mixed::Deferred(future) => {
                    delayed = true;
                    future.await?
                }
            };
        }
    }
    .boxed_local()
}

/// Call a producer with its arguments, then resolve whatever it returned.
///
/// The arguments only go to this first call; callables produced along the way
/// are invoked with none.
pub fn resolve_with<A, T, P>(
    producer: &mut P,
    args: A,
) -> LocalBoxFuture<'static, Result<Resolved<T>, Reason>>
where
    T: 'static,
    P: FnMut(A) -> Result<Mixed<T>, Reason>,
{
    match producer(args) {
        Ok(produced) => resolve(produced),
        Err(reason) => ready(Err(reason)).boxed_local(),
    }
}
