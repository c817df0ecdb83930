use core::fmt;

/// A 64-bit Snowflake-style ID carrying a machine and a node identity.
///
/// - 42 bits timestamp (ms since the generator clock's epoch)
/// - 5 bits machine ID
/// - 5 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21            17 16         12 11             0
///              +----------------+----------------+-------------+---------------+
///  Field:      | timestamp (42) | machine ID (5) | node ID (5) | sequence (12) |
///              +----------------+----------------+-------------+---------------+
///              |<---------- MSB ------------ 64 bits ----------- LSB ---------->|
/// ```
///
/// Ordering of two IDs follows the ordering of their raw integers, which is
/// the lexicographic order of `(timestamp, machine_id, node_id, sequence)`.
///
/// # Example
///
/// ```
/// use flurry::FlakeId;
///
/// let id = FlakeId::from_components(50, 3, 2, 0);
/// assert_eq!(id.timestamp(), 50);
/// assert_eq!(id.machine_id(), 3);
/// assert_eq!(id.node_id(), 2);
/// assert_eq!(id.sequence(), 0);
/// assert_eq!(id.to_raw(), (50 << 22) | (3 << 17) | (2 << 12));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 5-bit machine ID field. Occupies bits 17
    /// through 21.
    pub const MACHINE_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 5-bit node ID field. Occupies bits 12
    /// through 16.
    pub const NODE_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the machine ID to its correct position (bit 17).
    pub const MACHINE_ID_SHIFT: u64 = 17;

    /// Number of bits to shift the node ID to its correct position (bit 12).
    pub const NODE_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the four components into an ID.
    ///
    /// Each component is masked to its field width, so out-of-range values
    /// wrap instead of bleeding into neighbouring fields.
    pub const fn from_components(
        timestamp: u64,
        machine_id: u64,
        node_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | node_id | sequence,
        }
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID from the packed ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the node ID from the packed ID.
    pub const fn node_id(&self) -> u64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum possible value for the timestamp field.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum possible value for the machine ID field.
    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    /// Returns the maximum possible value for the node ID field.
    pub const fn max_node_id() -> u64 {
        Self::NODE_ID_MASK
    }

    /// Returns the maximum possible value for the sequence field.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the raw packed integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw packed integer. Every `u64` is a valid layout.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for FlakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &format_args!("0x{:016x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
