use core::time::Duration;

/// Unix epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A source of "milliseconds since some fixed epoch".
///
/// This is the only collaborator a generator has. It never reads time on its
/// own, so tests can substitute a fixed or scripted clock and get fully
/// deterministic IDs. Shifting the epoch (to stretch the 42-bit timestamp
/// field) is the clock's job as well.
///
/// Any `Fn() -> u64` closure is a time source.
///
/// # Example
///
/// ```
/// use flurry::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
///
/// let closure = || 99_u64;
/// assert_eq!(closure.current_millis(), 99);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<F> TimeSource for F
where
    F: Fn() -> u64,
{
    fn current_millis(&self) -> u64 {
        self()
    }
}
