use core::{future::Future, pin::Pin, time::Duration};

/// A boxed sleep future, for providers whose futures cannot be named.
pub type BoxedSleep = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A trait that abstracts over how to wait for a given [`Duration`] in async
/// contexts.
///
/// This is the explicit yield point in place of the blocking busy-spin: when
/// a generator is pending, the async adaptors await the provider's future
/// instead of hogging the executor thread.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across threads
    type Sleep: Future<Output = ()> + Send;

    fn sleep_for(dur: Duration) -> Self::Sleep;
}
