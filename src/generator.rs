//! Driving suspendable computations to completion.
//!
//! A [`Suspendable`] yields mixed values it wants to wait on. [`drive`] resolves
//! each one and feeds the outcome back in: `Ok(value)` on success, `Err(reason)`
//! on failure, so the computation can recover or give up. Whatever the
//! computation completes with is the result.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::init::InitSans;
use crate::mixed::{Mixed, Reason, Resume};
use crate::resolve::resolve;
use crate::sans::Sans;
use crate::step::Step;

type Rest<T> = Box<dyn Sans<Resume<T>, Mixed<T>, Return = Result<Mixed<T>, Reason>>>;

#[allow(clippy::type_complexity)]
type Started<T> = Step<(Mixed<T>, Rest<T>), Result<Mixed<T>, Reason>>;

/// Type-erased [`InitSans`] whose yields are mixed values.
pub struct Suspendable<T> {
    start: Box<dyn FnOnce() -> Started<T>>,
}

impl<T: 'static> Suspendable<T> {
    pub fn new<S>(stage: S) -> Self
    where
        S: InitSans<Resume<T>, Mixed<T>> + 'static,
        S::Next: Sans<Resume<T>, Mixed<T>, Return = Result<Mixed<T>, Reason>> + 'static,
    {
        Suspendable {
            start: Box::new(move || match stage.init() {
                Step::Yielded((first, rest)) => Step::Yielded((first, rest.boxed())),
                Step::Complete(done) => Step::Complete(done),
            }),
        }
    }

    /// The same computation as a single deferred value.
    pub fn into_deferred(self) -> Mixed<T> {
        Mixed::Deferred(drive(self).boxed_local())
    }

    fn start(self) -> Started<T> {
        (self.start)()
    }
}

/// Run a suspendable computation, resolving everything it yields.
pub fn drive<T: 'static>(
    suspendable: Suspendable<T>,
) -> LocalBoxFuture<'static, Result<Mixed<T>, Reason>> {
    async move {
        let (first, mut rest) = match suspendable.start() {
            Step::Yielded(started) => started,
            Step::Complete(done) => return done,
        };

        let mut input = settle(first).await;
        let mut resumes = 1_usize;
        loop {
            match rest.next(input) {
                Step::Yielded(pending) => {
                    input = settle(pending).await;
                    resumes += 1;
                }
                Step::Complete(done) => {
                    tracing::trace!(resumes, ok = done.is_ok(), "suspendable completed");
                    return done;
                }
            }
        }
    }
    .boxed_local()
}

async fn settle<T: 'static>(pending: Mixed<T>) -> Resume<T> {
    resolve(pending).await.map(|resolved| resolved.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{from_fn, init, init_from_fn};
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_feeds_resolved_values_back_in() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = seen.clone();
        let stage = init_from_fn(Mixed::resolved(1_u32), move |resumed: Resume<u32>| {
            let value = match resumed {
                Ok(value) => value,
                Err(reason) => return Step::Complete(Err(reason)),
            };
            log.borrow_mut().push(value);
            if value < 3 {
                Step::Yielded(Mixed::deferred(async move { Ok(value + 1) }))
            } else {
                Step::Complete(Ok(Mixed::Value(value * 10)))
            }
        });

        let done = drive(Suspendable::new(stage)).await.unwrap();
        assert!(matches!(done, Mixed::Value(30)));
        assert_eq!(&*seen.borrow(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_rejection_can_be_handled_inside() {
        let first = Mixed::<u32>::rejected(anyhow!("first try"));
        let stage = init_from_fn(first, |resumed: Resume<u32>| match resumed {
            Ok(value) => Step::Complete(Ok(Mixed::Value(value))),
            Err(_) => Step::Yielded(Mixed::resolved(99)),
        });

        let done = drive(Suspendable::new(stage)).await.unwrap();
        assert!(matches!(done, Mixed::Value(99)));
    }

    #[tokio::test]
    async fn test_unhandled_rejection_propagates() {
        let stage = init(
            Mixed::<u32>::rejected(anyhow!("boom")),
            from_fn(|resumed: Resume<u32>| Step::Complete(resumed.map(Mixed::Value))),
        );

        let err = drive(Suspendable::new(stage)).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_completes_without_yielding() {
        let stage: Step<(Mixed<u32>, Rest<u32>), Result<Mixed<u32>, Reason>> =
            Step::Complete(Err(anyhow!("never started")));

        let err = Suspendable::new(stage).into_deferred();
        let Mixed::Deferred(future) = err else {
            panic!("expected a deferred value");
        };
        assert_eq!(future.await.unwrap_err().to_string(), "never started");
    }
}
