//! `hll-cardinality` estimates the number of distinct byte strings in a stream or dataset
//! using HyperLogLog with one byte per register.
//!
//! Estimators are cheap to merge, which makes them suitable for aggregating distinct
//! counts across workers or shards, and can be persisted into a compact versioned
//! snapshot and restored later.
//!
//! ```
//! use hll_cardinality::{CardinalityEstimator, Murmur3};
//!
//! let mut estimator = CardinalityEstimator::<Murmur3>::new(12)?;
//! for user in ["alice", "bob", "carol", "alice"] {
//!     estimator.add(user);
//! }
//! assert_eq!(estimator.estimate().round(), 3.0);
//!
//! let snapshot = estimator.to_bytes();
//! let restored = CardinalityEstimator::<Murmur3>::from_bytes(&snapshot)?;
//! assert_eq!(restored.estimate(), estimator.estimate());
//! # Ok::<(), hll_cardinality::Error>(())
//! ```
pub mod error;
pub mod estimator;
pub mod hash;
mod hyperloglog;
#[cfg(feature = "with_serde")]
mod serde;
pub mod snapshot;

pub use error::{Error, FormatError, Result};
pub use estimator::{CardinalityEstimator, HASH_SEED, MAX_PRECISION, MIN_PRECISION};
pub use hash::{Hash32, Murmur3, WyHash32};
pub use snapshot::SNAPSHOT_VERSION;
