/// A result type whose error defaults to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flurry` can emit.
///
/// Identity validation is the only failure a generator reports. Once built,
/// formatting and advancing are total; a stalled or regressing clock shows up
/// as an endless spin in [`FlakeGenerator::advance`], never as an error.
///
/// [`FlakeGenerator::advance`]: crate::FlakeGenerator::advance
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine ID does not fit in 5 bits.
    #[error("machine id {machine_id} is too large (max {max})", max = crate::FlakeId::max_machine_id())]
    MachineIdTooLarge {
        /// The rejected value.
        machine_id: i64,
    },

    /// The machine ID is negative.
    #[error("machine id {machine_id} is too small (min 0)")]
    MachineIdTooSmall {
        /// The rejected value.
        machine_id: i64,
    },

    /// The node ID does not fit in 5 bits.
    #[error("node id {node_id} is too large (max {max})", max = crate::FlakeId::max_node_id())]
    NodeIdTooLarge {
        /// The rejected value.
        node_id: i64,
    },

    /// The node ID is negative.
    #[error("node id {node_id} is too small (min 0)")]
    NodeIdTooSmall {
        /// The rejected value.
        node_id: i64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(all(feature = "lock", not(feature = "parking-lot")))))]
    #[cfg(all(feature = "lock", not(feature = "parking-lot")))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
