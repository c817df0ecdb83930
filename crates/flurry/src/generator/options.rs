#[cfg(feature = "std")]
use crate::time::SystemClock;

/// When a generator consults its clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OverflowMode {
    /// Read the clock on every transition.
    ///
    /// A new millisecond resets the sequence to zero; within the same
    /// millisecond the sequence increments until it is exhausted.
    #[default]
    PerTick,

    /// Read the clock only once the sequence is exhausted.
    ///
    /// The sequence increments without any clock read while it has room, so a
    /// full batch of 4096 IDs can share one observed millisecond even when
    /// wall-clock time moved on in the meantime. IDs stay unique and ordered;
    /// their timestamps are just coarser.
    Bulk,
}

/// Construction options for a [`FlakeGenerator`].
///
/// `GeneratorOptions::default()` reads the wall clock (Unix epoch,
/// milliseconds) and uses [`OverflowMode::PerTick`].
///
/// # Example
///
/// ```
/// use flurry::{FlakeGenerator, GeneratorOptions, OverflowMode};
///
/// let options = GeneratorOptions::default()
///     .with_time(|| 1_630_163_558_780_u64)
///     .with_overflow(OverflowMode::Bulk);
///
/// let generator = FlakeGenerator::new(1, 1, options);
/// assert_eq!(generator.format_id(), 6_837_401_535_245_324_288);
/// ```
///
/// [`FlakeGenerator`]: crate::FlakeGenerator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorOptions<T> {
    /// The clock consulted for timestamps.
    pub time: T,
    /// The overflow policy.
    pub overflow: OverflowMode,
}

#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
impl Default for GeneratorOptions<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::default())
    }
}

impl<T> GeneratorOptions<T> {
    /// Options reading `time`, in [`OverflowMode::PerTick`].
    pub const fn new(time: T) -> Self {
        Self {
            time,
            overflow: OverflowMode::PerTick,
        }
    }

    /// Replaces the clock.
    pub fn with_time<U>(self, time: U) -> GeneratorOptions<U> {
        GeneratorOptions {
            time,
            overflow: self.overflow,
        }
    }

    /// Replaces the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowMode) -> Self {
        self.overflow = overflow;
        self
    }
}
