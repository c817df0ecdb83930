use core::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH as SYSTEM_UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH as SYSTEM_UNIX_EPOCH};

use crate::time::{TimeSource, UNIX_EPOCH};

/// A wall-clock time source reading [`SystemTime`] on every call.
///
/// Readings are milliseconds since `epoch`. The wall clock can be stepped
/// backwards by NTP or an operator; generators treat such a regression as a
/// stall and wait until the clock catches up again. Readings earlier than the
/// epoch saturate to `0`.
///
/// The default epoch is the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_epoch(UNIX_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a wall clock whose zero-point is `epoch`, given as a
    /// [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use flurry::{SystemClock, TimeSource, CUSTOM_EPOCH};
    ///
    /// let shifted = SystemClock::with_epoch(CUSTOM_EPOCH).current_millis();
    /// let unix = SystemClock::default().current_millis();
    /// assert!(unix - shifted >= CUSTOM_EPOCH.as_millis() as u64);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The epoch this clock counts from.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        let since_unix = SystemTime::now()
            .duration_since(SYSTEM_UNIX_EPOCH)
            .unwrap_or_default();
        since_unix.saturating_sub(self.epoch).as_millis() as u64
    }
}
