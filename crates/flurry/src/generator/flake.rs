use core::{cmp::Ordering, fmt};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{GeneratorOptions, Iter, OverflowMode},
    id::FlakeId,
    status::Poll,
    time::TimeSource,
};

/// Largest value of the 12-bit sequence field.
const MAX_SEQUENCE: u16 = FlakeId::SEQUENCE_MASK as u16;

/// A Snowflake ID generator for one `(machine_id, node_id)` identity.
///
/// The generator is a small state machine over `(last_millis, sequence)`.
/// Every transition moves that pair strictly forward, so the packed IDs it
/// produces are strictly increasing. Two generators never collide as long as
/// their identity pairs differ; assigning those pairs is up to the caller.
///
/// ## Driving it
/// - [`format_id`] reads the current ID without side effects.
/// - [`advance`] moves to the next state, busy-spinning while the sequence
///   is exhausted for the current millisecond.
/// - [`try_advance`] is the non-blocking single step behind `advance`.
/// - [`next_id`] and [`iter`] hand out each state exactly once.
///
/// ## Liveness
/// If the clock stalls forever (or keeps reporting a time before the last
/// minted timestamp) once the sequence is exhausted, [`advance`] and
/// [`next_id`] never return. Use [`try_advance`] / [`poll_next_id`] or one of
/// the async adaptors when bounded latency matters.
///
/// ## Sharing
/// Every transition takes `&mut self`; a generator has exactly one owner.
/// Serialize access yourself, or use [`LockFlakeGenerator`]. It deliberately
/// does not implement `Clone`: a copy would mint the same IDs twice.
///
/// [`format_id`]: Self::format_id
/// [`advance`]: Self::advance
/// [`try_advance`]: Self::try_advance
/// [`next_id`]: Self::next_id
/// [`poll_next_id`]: Self::poll_next_id
/// [`iter`]: Self::iter
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
pub struct FlakeGenerator<T>
where
    T: TimeSource,
{
    last_millis: u64,
    machine_id: u8,
    node_id: u8,
    sequence: u16,
    // Whether `next_id` has already handed out the current state.
    issued: bool,
    overflow: OverflowMode,
    time: T,
}

impl<T> FlakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for an identity the caller knows to be valid.
    ///
    /// Reads the clock once to seed `last_millis`; the sequence starts at
    /// zero. Identity values are masked to 5 bits (debug builds assert they
    /// are in range). Use [`Self::try_new`] for untrusted input.
    ///
    /// # Example
    /// ```
    /// use flurry::{FlakeGenerator, GeneratorOptions};
    ///
    /// let mut generator = FlakeGenerator::new(1, 1, GeneratorOptions::default());
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert!(a < b);
    /// ```
    pub fn new(machine_id: u8, node_id: u8, options: GeneratorOptions<T>) -> Self {
        debug_assert!(
            u64::from(machine_id) <= FlakeId::max_machine_id(),
            "machine_id overflow"
        );
        debug_assert!(
            u64::from(node_id) <= FlakeId::max_node_id(),
            "node_id overflow"
        );
        let now = options.time.current_millis();
        Self::from_components(now, machine_id, node_id, 0, options)
    }

    /// Creates a generator after validating both identity fields.
    ///
    /// # Errors
    ///
    /// Checked in this order, the first failing check wins:
    /// - [`Error::MachineIdTooLarge`] if `machine_id > 31`
    /// - [`Error::MachineIdTooSmall`] if `machine_id < 0`
    /// - [`Error::NodeIdTooLarge`] if `node_id > 31`
    /// - [`Error::NodeIdTooSmall`] if `node_id < 0`
    ///
    /// # Example
    /// ```
    /// use flurry::{Error, FlakeGenerator, GeneratorOptions};
    ///
    /// let err = FlakeGenerator::try_new(100, 1000, GeneratorOptions::default()).unwrap_err();
    /// assert_eq!(err, Error::MachineIdTooLarge { machine_id: 100 });
    /// ```
    pub fn try_new(machine_id: i64, node_id: i64, options: GeneratorOptions<T>) -> Result<Self> {
        let (machine_id, node_id) = validate_identity(machine_id, node_id)?;
        Ok(Self::new(machine_id, node_id, options))
    }

    /// Creates a generator from explicit state, without reading the clock.
    ///
    /// This is primarily useful for tests and for callers restoring state they
    /// persisted themselves. Every component is masked to its field width.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`] to let the
    /// generator initialize itself from the current time.
    pub fn from_components(
        timestamp: u64,
        machine_id: u8,
        node_id: u8,
        sequence: u16,
        options: GeneratorOptions<T>,
    ) -> Self {
        Self {
            last_millis: timestamp,
            machine_id: machine_id & FlakeId::MACHINE_ID_MASK as u8,
            node_id: node_id & FlakeId::NODE_ID_MASK as u8,
            sequence: sequence & MAX_SEQUENCE,
            issued: false,
            overflow: options.overflow,
            time: options.time,
        }
    }

    /// The packed form of the current state.
    ///
    /// A pure read: it neither consults the clock nor advances the sequence.
    pub fn format_id(&self) -> u64 {
        self.current_id().to_raw()
    }

    /// The current state as a [`FlakeId`].
    pub fn current_id(&self) -> FlakeId {
        FlakeId::from_components(
            self.last_millis,
            u64::from(self.machine_id),
            u64::from(self.node_id),
            u64::from(self.sequence),
        )
    }

    /// Moves to the next state, busy-spinning while the clock has not moved
    /// past an exhausted millisecond.
    ///
    /// The spin has no sleep, no yield and no bound. Returns the new current
    /// ID.
    pub fn advance(&mut self) -> FlakeId {
        self.advance_with(|_| core::hint::spin_loop())
    }

    /// Moves to the next state, calling `f` with the suggested back-off (in
    /// milliseconds) each time an attempt comes back [`Poll::Pending`].
    ///
    /// # Example
    /// ```
    /// use flurry::{FlakeGenerator, GeneratorOptions};
    ///
    /// let mut generator = FlakeGenerator::new(0, 0, GeneratorOptions::default());
    /// let id = generator.advance_with(|_| std::thread::yield_now());
    /// assert_eq!(id, generator.current_id());
    /// ```
    pub fn advance_with(&mut self, mut f: impl FnMut(u64)) -> FlakeId {
        loop {
            match self.try_advance() {
                Poll::Ready { id } => break id,
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Attempts a single transition.
    ///
    /// Returns [`Poll::Ready`] with the new current ID, or [`Poll::Pending`]
    /// with the state unchanged when advancing would reuse a timestamp.
    ///
    /// # Example
    /// ```
    /// use flurry::{FlakeGenerator, GeneratorOptions, Poll};
    ///
    /// let options = GeneratorOptions::default().with_time(|| 42_u64);
    /// let mut generator = FlakeGenerator::from_components(42, 0, 0, 4095, options);
    /// assert_eq!(generator.try_advance(), Poll::Pending { yield_for: 1 });
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_advance(&mut self) -> Poll {
        match self.overflow {
            OverflowMode::PerTick => self.poll_per_tick(),
            OverflowMode::Bulk => self.poll_bulk(),
        }
    }

    /// Hands out the next unissued ID, blocking like [`Self::advance`].
    ///
    /// The first call returns the state the generator was created with; every
    /// later call advances first. Nothing is computed ahead of the call, so a
    /// consumer can stop at any point without the generator spinning on an
    /// ID nobody asked for.
    pub fn next_id(&mut self) -> FlakeId {
        self.next_id_with(|_| core::hint::spin_loop())
    }

    /// Like [`Self::next_id`], calling `f` with the suggested back-off while
    /// the generator is pending.
    pub fn next_id_with(&mut self, mut f: impl FnMut(u64)) -> FlakeId {
        loop {
            match self.poll_next_id() {
                Poll::Ready { id } => break id,
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Non-blocking form of [`Self::next_id`].
    pub fn poll_next_id(&mut self) -> Poll {
        if !self.issued {
            self.issued = true;
            return Poll::Ready {
                id: self.current_id(),
            };
        }
        self.try_advance()
    }

    /// An unbounded, lazy iterator over [`Self::next_id`].
    ///
    /// # Example
    /// ```
    /// use flurry::{FlakeGenerator, GeneratorOptions};
    ///
    /// let mut generator = FlakeGenerator::new(3, 7, GeneratorOptions::default());
    /// let ids: Vec<_> = generator.iter().take(3).collect();
    /// assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    /// ```
    pub fn iter(&mut self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// The machine ID encoded into every ID.
    pub const fn machine_id(&self) -> u8 {
        self.machine_id
    }

    /// The node ID encoded into every ID.
    pub const fn node_id(&self) -> u8 {
        self.node_id
    }

    /// The sequence index of the current state.
    pub const fn sequence(&self) -> u16 {
        self.sequence
    }

    /// The timestamp of the current state.
    pub const fn last_millis(&self) -> u64 {
        self.last_millis
    }

    /// The overflow policy this generator was built with.
    pub const fn overflow(&self) -> OverflowMode {
        self.overflow
    }

    /// The clock this generator reads.
    pub const fn time(&self) -> &T {
        &self.time
    }

    fn poll_per_tick(&mut self) -> Poll {
        let now = self.time.current_millis();
        match now.cmp(&self.last_millis) {
            Ordering::Equal => {
                if self.has_sequence_room() {
                    self.increment_sequence()
                } else {
                    self.cold_sequence_exhausted()
                }
            }
            Ordering::Greater => self.rollover_to_timestamp(now),
            Ordering::Less => self.cold_clock_behind(now),
        }
    }

    fn poll_bulk(&mut self) -> Poll {
        if self.has_sequence_room() {
            return self.increment_sequence();
        }
        let now = self.time.current_millis();
        match now.cmp(&self.last_millis) {
            Ordering::Greater => self.rollover_to_timestamp(now),
            Ordering::Equal => self.cold_sequence_exhausted(),
            Ordering::Less => self.cold_clock_behind(now),
        }
    }

    fn has_sequence_room(&self) -> bool {
        self.sequence < MAX_SEQUENCE
    }

    // A state returned by a transition has been seen by the caller, so
    // `next_id` must not hand it out again.
    fn increment_sequence(&mut self) -> Poll {
        self.sequence += 1;
        self.issued = true;
        Poll::Ready {
            id: self.current_id(),
        }
    }

    fn rollover_to_timestamp(&mut self, now: u64) -> Poll {
        #[cfg(feature = "tracing")]
        tracing::trace!(from = self.last_millis, to = now, "tick rollover");
        self.last_millis = now;
        self.sequence = 0;
        self.issued = true;
        Poll::Ready {
            id: self.current_id(),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(&self) -> Poll {
        #[cfg(feature = "tracing")]
        tracing::trace!(millis = self.last_millis, "sequence exhausted");
        Poll::Pending { yield_for: 1 }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: u64) -> Poll {
        let yield_for = self.last_millis - now;
        #[cfg(feature = "tracing")]
        tracing::trace!(now, last = self.last_millis, yield_for, "clock behind");
        debug_assert!(yield_for > 0);
        Poll::Pending { yield_for }
    }
}

impl<T> fmt::Debug for FlakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeGenerator")
            .field("last_millis", &self.last_millis)
            .field("machine_id", &self.machine_id)
            .field("node_id", &self.node_id)
            .field("sequence", &self.sequence)
            .field("overflow", &self.overflow)
            .finish_non_exhaustive()
    }
}

/// Checks an identity pair against the 5-bit field widths.
///
/// Machine checks run before node checks, and "too large" before "too small".
pub(crate) fn validate_identity(machine_id: i64, node_id: i64) -> Result<(u8, u8)> {
    const MAX_MACHINE_ID: i64 = FlakeId::MACHINE_ID_MASK as i64;
    const MAX_NODE_ID: i64 = FlakeId::NODE_ID_MASK as i64;

    if machine_id > MAX_MACHINE_ID {
        return Err(Error::MachineIdTooLarge { machine_id });
    }
    if machine_id < 0 {
        return Err(Error::MachineIdTooSmall { machine_id });
    }
    if node_id > MAX_NODE_ID {
        return Err(Error::NodeIdTooLarge { node_id });
    }
    if node_id < 0 {
        return Err(Error::NodeIdTooSmall { node_id });
    }
    Ok((machine_id as u8, node_id as u8))
}
