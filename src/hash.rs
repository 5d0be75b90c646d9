//! ## Hash functions
//! The estimator maps every item to a 32-bit hash. The top `P` bits of the hash select
//! a register and the remaining `32 - P` bits produce the rank, so the hash must spread
//! its output uniformly over the whole 32-bit space.
//!
//! Any implementation of [`Hash32`] can be plugged into `CardinalityEstimator` through its
//! `H` type parameter. Estimators built with different hash functions see different
//! registers for the same items, which is why the hash is part of the estimator type and
//! two estimators can only be merged when they share it.

/// Seeded 32-bit hash over raw bytes.
pub trait Hash32 {
    fn hash32(data: &[u8], seed: u32) -> u32;
}

/// MurmurHash3 x86 32-bit variant (the default).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Murmur3;

impl Hash32 for Murmur3 {
    #[inline]
    fn hash32(data: &[u8], seed: u32) -> u32 {
        mur3::murmurhash3_x86_32(data, seed)
    }
}

/// `wyhash` with its 64-bit output folded into 32 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WyHash32;

impl Hash32 for WyHash32 {
    #[inline]
    fn hash32(data: &[u8], seed: u32) -> u32 {
        let h = wyhash::wyhash(data, u64::from(seed));
        (h as u32) ^ ((h >> 32) as u32)
    }
}
