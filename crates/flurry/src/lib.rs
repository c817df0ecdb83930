//! Snowflake-style 64-bit IDs for a `(machine_id, node_id)` identity.
//!
//! A [`FlakeId`] packs a 42-bit millisecond timestamp, a 5-bit machine ID, a
//! 5-bit node ID and a 12-bit sequence into one `u64`. A [`FlakeGenerator`]
//! hands them out in strictly increasing order, reading time from any
//! [`TimeSource`] so tests can drive it with a fake clock.
//!
//! ```
//! use flurry::{FlakeGenerator, GeneratorOptions, OverflowMode};
//!
//! let options = GeneratorOptions::default().with_overflow(OverflowMode::Bulk);
//! let mut generator = FlakeGenerator::try_new(3, 2, options).unwrap();
//!
//! let ids: Vec<_> = generator.iter().take(1000).collect();
//! assert!(ids.windows(2).all(|w| w[0] < w[1]));
//! assert!(ids.iter().all(|id| id.machine_id() == 3 && id.node_id() == 2));
//! ```
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod status;
mod time;

pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::status::*;
pub use crate::time::*;
