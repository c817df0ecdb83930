use crate::FlakeId;

/// The outcome of a single, non-blocking transition attempt.
///
/// - [`Poll::Ready`] means the generator advanced and `id` is its new current
///   ID.
/// - [`Poll::Pending`] means the sequence is exhausted for the current
///   millisecond (or the clock reads earlier than the last minted timestamp)
///   and the state was left untouched. Try again once roughly `yield_for`
///   milliseconds have passed.
///
/// # Example
///
/// ```
/// use flurry::{FlakeGenerator, GeneratorOptions, Poll};
///
/// let options = GeneratorOptions::default().with_time(|| 1_u64);
/// let mut generator = FlakeGenerator::from_components(1, 0, 0, 4095, options);
/// match generator.try_advance() {
///     Poll::Ready { id } => println!("ID: {id}"),
///     Poll::Pending { yield_for } => println!("Back off for {yield_for}ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Poll {
    /// The generator advanced.
    Ready {
        /// The generator's new current ID.
        id: FlakeId,
    },
    /// The generator could not advance without reusing a timestamp.
    Pending {
        /// Milliseconds until the clock is expected to move past the last
        /// minted timestamp. Always at least 1.
        yield_for: u64,
    },
}

impl Poll {
    /// Returns `true` if the generator advanced.
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Returns `true` if the generator must wait for the clock.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}
