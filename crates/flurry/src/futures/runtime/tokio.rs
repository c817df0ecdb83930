use core::{future::Future, time::Duration};

use crate::{
    futures::{BoxedSleep, FlakeGeneratorAsyncExt, SleepProvider},
    generator::FlakeGenerator,
    id::FlakeId,
    time::TimeSource,
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`TokioSleep`]) is often
/// more efficient due to reduced scheduler churn.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    type Sleep = BoxedSleep;

    fn sleep_for(_dur: Duration) -> Self::Sleep {
        Box::pin(tokio::task::yield_now())
    }
}

/// Extension trait for awaiting IDs on the [`tokio`](https://docs.rs/tokio)
/// runtime.
///
/// This trait uses [`TokioSleep`] as the sleep provider, so callers don't have
/// to name one.
pub trait FlakeGeneratorAsyncTokioExt {
    /// Returns a future that resolves to the next ID, sleeping on Tokio's timer
    /// while the generator is pending.
    fn next_id_async_tokio(&mut self) -> impl Future<Output = FlakeId> + Send;
}

impl<T> FlakeGeneratorAsyncTokioExt for FlakeGenerator<T>
where
    T: TimeSource + Send,
{
    fn next_id_async_tokio(&mut self) -> impl Future<Output = FlakeId> + Send {
        self.next_id_async::<TokioSleep>()
    }
}
