use core::{
    future::Future,
    marker::PhantomData,
    pin::Pin,
    task::{Context, Poll as TaskPoll, ready},
    time::Duration,
};

use futures::Stream;
use pin_project_lite::pin_project;

use super::SleepProvider;
use crate::{generator::FlakeGenerator, id::FlakeId, status::Poll, time::TimeSource};

/// Extension trait for awaiting IDs from a [`FlakeGenerator`].
///
/// When the sequence is exhausted for the current millisecond, the returned
/// futures wait through the [`SleepProvider`] `S` instead of busy-spinning.
pub trait FlakeGeneratorAsyncExt {
    /// Returns a future that resolves to the next ID, with the same semantics
    /// as [`FlakeGenerator::next_id`].
    fn next_id_async<S>(&mut self) -> impl Future<Output = FlakeId> + Send
    where
        S: SleepProvider;
}

impl<T> FlakeGeneratorAsyncExt for FlakeGenerator<T>
where
    T: TimeSource + Send,
{
    fn next_id_async<S>(&mut self) -> impl Future<Output = FlakeId> + Send
    where
        S: SleepProvider,
    {
        NextIdFuture::<T, S>::new(self)
    }
}

pin_project! {
    /// A future that polls a [`FlakeGenerator`] until it hands out its next
    /// ID.
    ///
    /// `Pending` transitions are handled by sleeping through `S` for the
    /// suggested back-off before polling the generator again.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct NextIdFuture<'a, T, S>
    where
        T: TimeSource,
        S: SleepProvider,
    {
        generator: &'a mut FlakeGenerator<T>,
        #[pin]
        sleep: Option<S::Sleep>,
        _provider: PhantomData<fn() -> S>,
    }
}

impl<'a, T, S> NextIdFuture<'a, T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    /// Wraps `generator`. Nothing happens until the future is polled.
    pub fn new(generator: &'a mut FlakeGenerator<T>) -> Self {
        Self {
            generator,
            sleep: None,
            _provider: PhantomData,
        }
    }
}

impl<T, S> Future for NextIdFuture<'_, T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    type Output = FlakeId;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> TaskPoll<Self::Output> {
        let mut this = self.project();
        loop {
            if let Some(sleep) = this.sleep.as_mut().as_pin_mut() {
                ready!(sleep.poll(cx));
                this.sleep.set(None);
            }

            match this.generator.poll_next_id() {
                Poll::Ready { id } => return TaskPoll::Ready(id),
                Poll::Pending { yield_for } => {
                    this.sleep
                        .set(Some(S::sleep_for(Duration::from_millis(yield_for))));
                }
            }
        }
    }
}

/// An unbounded [`Stream`] of IDs from an owned [`FlakeGenerator`].
///
/// The stream never ends on its own. Nothing is generated until it is
/// polled, and dropping it is all the cancellation there is. While the
/// generator is pending, the stream parks on `S::sleep_for`, giving the
/// executor a chance to run other tasks.
///
/// The pending sleep is boxed, so the stream is `Unpin` whatever `S` is and
/// [`Self::into_inner`] works after any amount of polling.
#[must_use = "streams do nothing unless polled"]
pub struct FlakeStream<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    generator: FlakeGenerator<T>,
    sleep: Option<Pin<Box<S::Sleep>>>,
    _provider: PhantomData<fn() -> S>,
}

impl<T, S> FlakeStream<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    /// Wraps `generator`; the first item is the generator's next unissued ID.
    pub fn new(generator: FlakeGenerator<T>) -> Self {
        Self {
            generator,
            sleep: None,
            _provider: PhantomData,
        }
    }

    /// Returns the generator, positioned after the last yielded ID.
    pub fn into_inner(self) -> FlakeGenerator<T> {
        self.generator
    }
}

// The generator is never pinned and the sleep is boxed.
impl<T, S> Unpin for FlakeStream<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
}

impl<T, S> Stream for FlakeStream<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    type Item = FlakeId;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> TaskPoll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(sleep) = this.sleep.as_mut() {
                ready!(sleep.as_mut().poll(cx));
                this.sleep = None;
            }

            match this.generator.poll_next_id() {
                Poll::Ready { id } => return TaskPoll::Ready(Some(id)),
                Poll::Pending { yield_for } => {
                    this.sleep = Some(Box::pin(S::sleep_for(Duration::from_millis(yield_for))));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T> FlakeGenerator<T>
where
    T: TimeSource,
{
    /// Turns the generator into an unbounded [`FlakeStream`] that waits
    /// through `S`.
    pub fn into_stream<S>(self) -> FlakeStream<T, S>
    where
        S: SleepProvider,
    {
        FlakeStream::new(self)
    }
}
