//! The stateful computation trait behind suspendable values.
//!
//! A [`Sans`] receives an input, and either yields an intermediate output or
//! completes. Suspendable mixed values are built from it: every yielded value is
//! something to wait on, and every input is what that wait produced.
//!
//! ```rust
//! use spex::prelude::*;
//!
//! let mut stage = from_fn(|x: i32| if x < 10 { Step::Yielded(x * 2) } else { Step::Complete(x) });
//! assert_eq!(stage.next(5).unwrap_yielded(), 10);
//! assert_eq!(stage.next(30).unwrap_complete(), 30);
//! ```

use crate::step::Step;

/// Stateful computation that processes input and yields intermediate values.
pub trait Sans<I, O> {
    /// Type of final result when computation completes
    type Return;

    /// Process input, returning `Yielded` to continue or `Complete` to finish.
    fn next(&mut self, input: I) -> Step<O, Self::Return>;

    fn boxed(self) -> Box<dyn Sans<I, O, Return = Self::Return>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<I, O, L, R> Sans<I, O> for either::Either<L, R>
where
    L: Sans<I, O>,
    R: Sans<I, O, Return = L::Return>,
{
    type Return = L::Return;
    fn next(&mut self, input: I) -> Step<O, Self::Return> {
        match self {
            either::Either::Left(l) => l.next(input),
            either::Either::Right(r) => r.next(input),
        }
    }
}

impl<I, O, D> Sans<I, O> for Box<dyn Sans<I, O, Return = D>> {
    type Return = D;

    fn next(&mut self, input: I) -> Step<O, Self::Return> {
        (**self).next(input)
    }
}
