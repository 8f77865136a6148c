//! Builders for computations with an initial output.
//!
//! A suspendable value has to produce its first intermediate value before it
//! has received anything, so it is always an [`InitSans`](crate::InitSans).

use super::func::{FromFn, from_fn};
use crate::{Sans, Step};

/// Pair an initial output with the computation that handles what comes back.
///
/// ```rust
/// use spex::prelude::*;
///
/// let (first, mut rest) = init(10, from_fn(|x: i32| {
///     if x > 0 { Step::Yielded(x + 1) } else { Step::Complete("done") }
/// }));
/// assert_eq!(first, 10);
/// assert_eq!(rest.next(10).unwrap_yielded(), 11);
/// assert_eq!(rest.next(0).unwrap_complete(), "done");
/// ```
pub fn init<I, O, S>(output: O, continuation: S) -> (O, S)
where
    S: Sans<I, O>,
{
    (output, continuation)
}

/// Yield an initial value, then continue with a closure.
///
/// ```rust
/// use spex::prelude::*;
///
/// let mut counter = 0;
/// let (initial, mut stage) = init_from_fn(42, move |x: i32| {
///     counter += 1;
///     if counter < 3 { Step::Yielded(x * counter) } else { Step::Complete(x + counter) }
/// });
/// assert_eq!(initial, 42);
/// assert_eq!(stage.next(10).unwrap_yielded(), 10);
/// assert_eq!(stage.next(10).unwrap_yielded(), 20);
/// assert_eq!(stage.next(10).unwrap_complete(), 13);
/// ```
pub fn init_from_fn<I, O, D, F>(initial: O, f: F) -> (O, FromFn<F>)
where
    F: FnMut(I) -> Step<O, D>,
{
    (initial, from_fn(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InitSans;

    #[test]
    fn test_init_yields_seed_first() {
        let mut total = 1_u64;
        let sums = init(
            total,
            from_fn(move |n: u64| {
                total += n;
                if total < 100 { Step::Yielded(total) } else { Step::Complete(total) }
            }),
        );

        let (seed, mut rest) = sums.init().unwrap_yielded();
        assert_eq!(seed, 1);
        for expected in 2..100 {
            assert_eq!(rest.next(1).unwrap_yielded(), expected);
        }
        assert_eq!(rest.next(1).unwrap_complete(), 100);
    }

    #[test]
    fn test_init_from_fn_completes_from_closure() {
        let (first, mut rest) = init_from_fn("start", |input: &'static str| {
            if input == "stop" { Step::Complete(input.len()) } else { Step::Yielded(input) }
        });

        assert_eq!(first, "start");
        assert_eq!(rest.next("go").unwrap_yielded(), "go");
        assert_eq!(rest.next("stop").unwrap_complete(), 4);
    }
}
