use core::{future::Future, time::Duration};

use smol::Timer;

use crate::{
    futures::{BoxedSleep, FlakeGeneratorAsyncExt, SleepProvider},
    generator::FlakeGenerator,
    id::FlakeId,
    time::TimeSource,
};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    type Sleep = BoxedSleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        Box::pin(async move {
            Timer::after(dur).await;
        })
    }
}

/// An implementation of [`SleepProvider`] using Smol's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`SmolSleep`]) is often
/// more efficient due to reduced scheduler churn.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    type Sleep = smol::future::YieldNow;

    fn sleep_for(_dur: Duration) -> Self::Sleep {
        smol::future::yield_now()
    }
}

/// Extension trait for awaiting IDs on the [`smol`](https://docs.rs/smol)
/// runtime, using [`SmolSleep`] as the sleep provider.
pub trait FlakeGeneratorAsyncSmolExt {
    /// Returns a future that resolves to the next ID, sleeping on Smol's timer
    /// while the generator is pending.
    fn next_id_async_smol(&mut self) -> impl Future<Output = FlakeId> + Send;
}

impl<T> FlakeGeneratorAsyncSmolExt for FlakeGenerator<T>
where
    T: TimeSource + Send,
{
    fn next_id_async_smol(&mut self) -> impl Future<Output = FlakeId> + Send {
        self.next_id_async::<SmolSleep>()
    }
}
