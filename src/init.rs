use crate::{Sans, Step};

/// Computations that produce an output before processing any input.
///
/// Every suspendable value starts this way: it yields the first thing to wait
/// on, and only then receives what that wait produced.
///
/// ```rust
/// use spex::prelude::*;
///
/// let stage = init_from_fn(42, |x: i32| Step::<i32, i32>::Complete(x + 1));
/// let (initial, mut rest) = stage.init().unwrap_yielded();
/// assert_eq!(initial, 42);
/// assert_eq!(rest.next(1).unwrap_complete(), 2);
/// ```
pub trait InitSans<I, O> {
    type Next: Sans<I, O>;

    /// Execute the first stage.
    ///
    /// Returns `Yielded((output, continuation))` for normal execution,
    /// or `Complete(return)` if the computation finishes immediately.
    #[allow(clippy::type_complexity)]
    fn init(self) -> Step<(O, Self::Next), <Self::Next as Sans<I, O>>::Return>;
}

impl<I, O, S> InitSans<I, O> for (O, S)
where
    S: Sans<I, O>,
{
    type Next = S;
    fn init(self) -> Step<(O, S), S::Return> {
        Step::Yielded(self)
    }
}

impl<I, O, S> InitSans<I, O> for Step<(O, S), S::Return>
where
    S: Sans<I, O>,
{
    type Next = S;
    fn init(self) -> Step<(O, S), S::Return> {
        self
    }
}
