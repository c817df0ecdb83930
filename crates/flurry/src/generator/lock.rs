use core::fmt;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{FlakeGenerator, GeneratorOptions, Mutex},
    id::FlakeId,
    status::Poll,
    time::TimeSource,
};

/// A lock-based wrapper that lets many threads share one
/// [`FlakeGenerator`].
///
/// The generator sits behind an `Arc<Mutex<_>>`; clones share the same state
/// and so the same total order of IDs. Each call holds the lock for exactly
/// one transition attempt. Waiting on an exhausted millisecond happens
/// outside the lock.
///
/// With the `parking-lot` feature the mutex cannot poison and
/// [`Self::next_id`] becomes available.
///
/// ## Recommended When
/// - Several threads must draw from one identity pair
/// - You would otherwise wrap a generator in a mutex by hand
pub struct LockFlakeGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<FlakeGenerator<T>>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<FlakeGenerator<T>>>,
}

impl<T> Clone for LockFlakeGenerator<T>
where
    T: TimeSource,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for LockFlakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFlakeGenerator")
            .field("handles", &Arc::strong_count(&self.state))
            .finish_non_exhaustive()
    }
}

impl<T> From<FlakeGenerator<T>> for LockFlakeGenerator<T>
where
    T: TimeSource,
{
    fn from(generator: FlakeGenerator<T>) -> Self {
        #[cfg(feature = "cache-padded")]
        let state = Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(generator)));
        #[cfg(not(feature = "cache-padded"))]
        let state = Arc::new(Mutex::new(generator));
        Self { state }
    }
}

impl<T> LockFlakeGenerator<T>
where
    T: TimeSource,
{
    /// See [`FlakeGenerator::new`].
    pub fn new(machine_id: u8, node_id: u8, options: GeneratorOptions<T>) -> Self {
        FlakeGenerator::new(machine_id, node_id, options).into()
    }

    /// See [`FlakeGenerator::try_new`].
    ///
    /// # Errors
    ///
    /// Returns the identity validation error of [`FlakeGenerator::try_new`].
    pub fn try_new(machine_id: i64, node_id: i64, options: GeneratorOptions<T>) -> Result<Self> {
        FlakeGenerator::try_new(machine_id, node_id, options).map(Self::from)
    }

    /// Attempts to take the next ID with a single, non-blocking transition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if another thread panicked while
    /// holding the lock (std mutex only).
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        #[cfg(not(feature = "parking-lot"))]
        let mut generator = self.state.lock()?;
        #[cfg(feature = "parking-lot")]
        let mut generator = self.state.lock();
        Ok(generator.poll_next_id())
    }

    /// Takes the next ID, calling `f` with the suggested back-off between
    /// attempts. The lock is released while `f` runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn try_next_id_with(&self, mut f: impl FnMut(u64)) -> Result<FlakeId> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Takes the next ID, yielding the thread between attempts.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    ///
    /// # Example
    /// ```
    /// use flurry::{GeneratorOptions, LockFlakeGenerator};
    ///
    /// let generator = LockFlakeGenerator::new(2, 9, GeneratorOptions::default());
    /// let shared = generator.clone();
    /// let handle = std::thread::spawn(move || shared.try_next_id().unwrap());
    /// let mine = generator.try_next_id().unwrap();
    /// assert_ne!(mine, handle.join().unwrap());
    /// ```
    pub fn try_next_id(&self) -> Result<FlakeId> {
        self.try_next_id_with(|_| std::thread::yield_now())
    }

    /// Takes the next ID, yielding the thread between attempts.
    #[cfg_attr(docsrs, doc(cfg(feature = "parking-lot")))]
    #[cfg(feature = "parking-lot")]
    pub fn next_id(&self) -> FlakeId {
        loop {
            match self.state.lock().poll_next_id() {
                Poll::Ready { id } => break id,
                Poll::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    /// Runs `f` with exclusive access to the underlying generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn with_generator<R>(&self, f: impl FnOnce(&mut FlakeGenerator<T>) -> R) -> Result<R> {
        #[cfg(not(feature = "parking-lot"))]
        let mut generator = self.state.lock()?;
        #[cfg(feature = "parking-lot")]
        let mut generator = self.state.lock();
        Ok(f(&mut generator))
    }
}
