//! Cardinality estimator allows to estimate number of distinct byte strings
//! in the stream or dataset and is defined with a runtime `precision` parameter
//! and a compile time hash function `H`:
//! - `precision`: in [4..16] range, defines number of hash bits used for
//!   HyperLogLog register indices, giving `m = 2^precision` registers.
//! - `H`: [`Hash32`] implementation, [`Murmur3`] by default.
//!
//! # Data-structure design rationale
//!
//! ## Memory footprint
//! One byte per register plus a fixed header, independent of the number of items:
//! - precision = 4: 16 registers
//! - precision = 10: 1 KiB of registers
//! - precision = 16: 64 KiB of registers
//!
//! ## Low latency
//! - `add`, `estimate`, `merge` and `clear` never allocate.
//! - The `alpha * m^2` bias correction constant is computed once, when the
//!   estimator is created or restored, and kept for its lifetime.
//! - Register merges are plain byte-wise maximums which the compiler vectorizes.
//!
//! ## Accuracy
//! Expected relative standard error is `1.04 / sqrt(m)`:
//!   precision = 10: 1.04 / sqrt(2^10) = 3.25%
//!   precision = 12: 1.04 / sqrt(2^12) = 1.62%
//!   precision = 14: 1.04 / sqrt(2^14) = 0.81%
//!   precision = 16: 1.04 / sqrt(2^16) = 0.41%
//!
//! Small cardinalities are estimated with linear counting over empty registers and
//! cardinalities approaching the 32-bit hash space get the saturation correction.
//!
//! # Concurrency
//! The estimator has no internal synchronization. It is `Send + Sync`, so independent
//! estimators can be filled on separate threads and folded into one with [`merge`].
//!
//! [`merge`]: CardinalityEstimator::merge

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::mem::size_of;

use crate::error::{Error, Result};
use crate::hash::{Hash32, Murmur3};
use crate::hyperloglog::{alpha_mm, decode_hash, estimate, merge_registers, update_register};

/// Smallest supported precision
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision
pub const MAX_PRECISION: u8 = 16;
/// Seed passed to the hash function for every item
pub const HASH_SEED: u32 = 313;

pub struct CardinalityEstimator<H: Hash32 = Murmur3> {
    /// Number of hash bits used for the register index
    pub(crate) precision: u8,
    /// `2^precision` registers, one byte each
    pub(crate) registers: Box<[u8]>,
    /// Cached `alpha * m^2`
    alpha_mm: f64,
    /// Zero-sized hash function marker
    hasher: PhantomData<H>,
}

impl<H: Hash32> CardinalityEstimator<H> {
    /// Creates new instance of `CardinalityEstimator` with `2^precision` empty registers
    pub fn new(precision: u8) -> Result<Self> {
        validate_precision(precision)?;
        let registers = vec![0u8; 1 << precision].into_boxed_slice();
        Ok(Self::from_parts(precision, registers))
    }

    /// Creates new instance of `CardinalityEstimator` with the smallest precision whose
    /// expected relative error `1.04 / sqrt(m)` does not exceed `error_rate`
    pub fn with_error_rate(error_rate: f64) -> Result<Self> {
        let invalid = Error::InvalidErrorRate {
            error_rate,
            max_precision: MAX_PRECISION,
        };
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(invalid);
        }

        // integer search, so a rate of exactly 1.04 / sqrt(m) maps back to its own precision
        match (MIN_PRECISION..=MAX_PRECISION)
            .find(|&p| 1.04 / f64::from(1u32 << p).sqrt() <= error_rate)
        {
            Some(precision) => Self::new(precision),
            None => Err(invalid),
        }
    }

    /// Assemble estimator from already validated precision and registers
    pub(crate) fn from_parts(precision: u8, registers: Box<[u8]>) -> Self {
        debug_assert_eq!(registers.len(), 1 << precision);
        Self {
            precision,
            alpha_mm: alpha_mm(registers.len()),
            registers,
            hasher: PhantomData,
        }
    }

    /// Return precision of `CardinalityEstimator`
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Return number of registers, always `2^precision`
    #[inline]
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Return read-only view of the registers
    #[inline]
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Add an item into `CardinalityEstimator`
    #[inline]
    pub fn add<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) {
        self.insert_hash(H::hash32(item.as_ref(), HASH_SEED));
    }

    /// Insert precomputed 32-bit hash into `CardinalityEstimator`
    #[inline]
    pub fn insert_hash(&mut self, hash: u32) {
        let (idx, rank) = decode_hash(hash, self.precision);
        update_register(&mut self.registers, idx, rank);
    }

    /// Return cardinality estimate
    #[inline]
    pub fn estimate(&self) -> f64 {
        estimate(&self.registers, self.alpha_mm)
    }

    /// Merge `rhs` into `self`, so that `self` estimates the union of both streams.
    ///
    /// Fails without modifying either estimator if register counts differ.
    pub fn merge(&mut self, rhs: &Self) -> Result<()> {
        if self.registers.len() != rhs.registers.len() {
            return Err(Error::RegisterCountMismatch {
                expected: self.registers.len(),
                actual: rhs.registers.len(),
            });
        }
        merge_registers(&mut self.registers, &rhs.registers);
        Ok(())
    }

    /// Reset all registers to zero
    #[inline]
    pub fn clear(&mut self) {
        self.registers.fill(0);
    }

    /// Return whether no item was added since creation or the last `clear`
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Return memory size of `CardinalityEstimator`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.len()
    }
}

/// Check that `precision` lies in `[MIN_PRECISION, MAX_PRECISION]`
pub(crate) fn validate_precision(precision: u8) -> Result<()> {
    if (MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(Error::InvalidPrecision {
            precision,
            min: MIN_PRECISION,
            max: MAX_PRECISION,
        })
    }
}

impl<H: Hash32> Clone for CardinalityEstimator<H> {
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            registers: self.registers.clone(),
            alpha_mm: self.alpha_mm,
            hasher: PhantomData,
        }
    }
}

impl<H: Hash32> PartialEq for CardinalityEstimator<H> {
    /// Compare cardinality estimators
    fn eq(&self, rhs: &Self) -> bool {
        self.precision == rhs.precision && self.registers == rhs.registers
    }
}

impl<H: Hash32> Debug for CardinalityEstimator<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, estimate: {:.0}, size: {} }}",
            self.precision,
            self.estimate(),
            self.size_of()
        )
    }
}

impl<H: Hash32, T: AsRef<[u8]>> Extend<T> for CardinalityEstimator<H> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(&item);
        }
    }
}
