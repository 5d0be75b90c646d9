//! ## HyperLogLog register math
//! Free functions over a register slice of `M = 2^P` bytes, where each register stores
//! the maximum rank observed for the hashes mapped to it.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! Hash layout for precision `P`:
//! - bits 31..(32 - P)   - register index (top `P` bits)
//! - bits (31 - P)..0    - rank bits (`32 - P` bits), scanned from the most significant side
//!
//! The rank is the number of leading zero rank bits plus one. When every rank bit is zero
//! the rank saturates at `32 - P + 1`, so register values lie in `[0, 33 - P]`.
//!
//! Once enough registers approach saturation the raw estimate exceeds `2^32`, the
//! large range correction takes the logarithm of a negative number and the estimate
//! is `NaN`. That is the limit of a 32-bit hash, e.g. every register at `33 - P`.

/// 2^32, the size of the hash space
const POW_2_32: f64 = 4_294_967_296.0;

/// Return the largest rank a register can hold for the given precision
#[inline]
pub(crate) fn max_rank(precision: u8) -> u8 {
    33 - precision
}

/// Split `hash` into register index and rank
#[inline]
pub(crate) fn decode_hash(hash: u32, precision: u8) -> (usize, u8) {
    let p = u32::from(precision);
    let idx = (hash >> (32 - p)) as usize;
    let rank = rho(hash << p, 32 - p);
    (idx, rank)
}

/// Position of the first set bit of `x` counted from the most significant side,
/// looking at no more than `width` bits. Returns `width + 1` when none of them is set.
#[inline]
fn rho(x: u32, width: u32) -> u8 {
    (x.leading_zeros().min(width) + 1) as u8
}

/// Parameter for bias correction
#[inline]
pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Bias correction constant `alpha * m^2` used by the raw estimate
#[inline]
pub(crate) fn alpha_mm(m: usize) -> f64 {
    let m_f = m as f64;
    alpha(m) * m_f * m_f
}

/// Update register `idx` with `rank`, keeping the maximum
#[inline]
pub(crate) fn update_register(registers: &mut [u8], idx: usize, rank: u8) {
    let reg = &mut registers[idx];
    if rank > *reg {
        *reg = rank;
    }
}

/// Register-wise maximum of `lhs` and `rhs` stored into `lhs`.
///
/// Both slices are expected to have equal length.
#[inline]
pub(crate) fn merge_registers(lhs: &mut [u8], rhs: &[u8]) {
    // equal length zip auto-vectorizes
    lhs.iter_mut()
        .zip(rhs.iter())
        .for_each(|(l, &r)| *l = (*l).max(r));
}

/// Return cardinality estimate from registers with small and large range corrections
#[inline]
pub(crate) fn estimate(registers: &[u8], alpha_mm: f64) -> f64 {
    let m = registers.len() as f64;

    let sum: f64 = registers
        .iter()
        .map(|&r| 1.0 / ((1u64 << r) as f64))
        .sum();
    let raw = alpha_mm / sum;

    if raw <= 2.5 * m {
        let zeros = registers.iter().filter(|&&r| r == 0).count();
        if zeros == 0 {
            raw
        } else {
            m * (m / zeros as f64).ln()
        }
    } else if raw > POW_2_32 / 30.0 {
        -POW_2_32 * (1.0 - raw / POW_2_32).ln()
    } else {
        raw
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    /// Bit-by-bit scan of the rank bits, kept as the reference for `rho`
    fn rho_scan(mut x: u32, width: u32) -> u8 {
        let mut v = 1u32;
        while v <= width && x & 0x8000_0000 == 0 {
            v += 1;
            x <<= 1;
        }
        v as u8
    }

    #[test_case(16 => 0.673)]
    #[test_case(32 => 0.697)]
    #[test_case(64 => 0.709)]
    #[test_case(1024 => 0.7213 / (1.0 + 1.079 / 1024.0))]
    #[test_case(65536 => 0.7213 / (1.0 + 1.079 / 65536.0))]
    fn test_alpha(m: usize) -> f64 {
        alpha(m)
    }

    #[test_case(0x0000_0000, 4 => (0, 29); "all zero saturates p4")]
    #[test_case(0x0000_0000, 16 => (0, 17); "all zero saturates p16")]
    #[test_case(0xffff_ffff, 4 => (15, 1); "all ones")]
    #[test_case(0xf000_0000, 4 => (15, 29); "index bits only")]
    #[test_case(0x0800_0000, 4 => (0, 1); "first rank bit set")]
    #[test_case(0x0000_0001, 4 => (0, 28); "last rank bit set p4")]
    #[test_case(0x0000_0001, 16 => (0, 16); "last rank bit set p16")]
    #[test_case(0xabcd_0000, 16 => (0xabcd, 17); "index only p16")]
    #[test_case(0x0048_0000, 10 => (1, 3); "rank three p10")]
    fn test_decode_hash(hash: u32, precision: u8) -> (usize, u8) {
        decode_hash(hash, precision)
    }

    #[test]
    fn test_rho_matches_bit_scan() {
        for precision in 4..=16u32 {
            let width = 32 - precision;
            let mut x = 0x9e37_79b9u32;
            for _ in 0..10_000 {
                x = x.wrapping_mul(0x0019_660d).wrapping_add(0x3c6e_f35f);
                let shifted = x << precision;
                assert_eq!(rho(shifted, width), rho_scan(shifted, width));
            }
            assert_eq!(rho(0, width), rho_scan(0, width));
            assert_eq!(u32::from(rho(0, width)), width + 1);
        }
    }

    #[test]
    fn test_rank_never_exceeds_max() {
        for precision in 4..=16u8 {
            let (_, rank) = decode_hash(0, precision);
            assert_eq!(rank, max_rank(precision));
        }
    }

    #[test_case(4)]
    #[test_case(10)]
    #[test_case(16)]
    fn test_estimate_empty_is_zero(precision: u8) {
        let m = 1 << precision;
        let registers = vec![0u8; m];
        assert_eq!(estimate(&registers, alpha_mm(m)), 0.0);
    }

    #[test]
    fn test_estimate_linear_counting() {
        let m = 1024;
        let mut registers = vec![0u8; m];
        registers[0] = 1;
        registers[1] = 3;
        let expected = 1024.0 * (1024.0f64 / 1022.0).ln();
        assert_eq!(estimate(&registers, alpha_mm(m)), expected);
    }

    #[test]
    fn test_estimate_no_zeros_keeps_raw() {
        // all registers at rank 1 gives raw estimate 2 * alpha * m, below 2.5 * m
        let m = 1024;
        let registers = vec![1u8; m];
        let expected = alpha_mm(m) / (m as f64 * 0.5);
        assert_eq!(estimate(&registers, alpha_mm(m)), expected);
    }

    #[test]
    fn test_estimate_mid_range_is_raw() {
        let m = 1024;
        let registers = vec![10u8; m];
        let raw = alpha_mm(m) / (m as f64 / 1024.0);
        assert!(raw > 2.5 * m as f64 && raw <= POW_2_32 / 30.0);
        assert_eq!(estimate(&registers, alpha_mm(m)), raw);
    }

    #[test]
    fn test_estimate_large_range_correction() {
        let m = 16;
        let registers = vec![24u8; m];
        let raw = alpha_mm(m) / (m as f64 / (1u64 << 24) as f64);
        assert!(raw > POW_2_32 / 30.0);
        let corrected = estimate(&registers, alpha_mm(m));
        assert_eq!(corrected, -POW_2_32 * (1.0 - raw / POW_2_32).ln());
        assert!(corrected > raw);
    }

    #[test_case(4; "p4")]
    #[test_case(10; "p10")]
    #[test_case(16; "p16")]
    fn test_estimate_saturated_registers_is_nan(precision: u8) {
        let m = 1 << precision;
        let registers = vec![max_rank(precision); m];
        let raw = alpha_mm(m) / (m as f64 / (1u64 << max_rank(precision)) as f64);
        assert!(raw > POW_2_32);
        assert!(estimate(&registers, alpha_mm(m)).is_nan());
    }

    #[test]
    fn test_merge_registers() {
        let mut lhs = vec![0, 5, 2, 7];
        let rhs = vec![3, 1, 2, 9];
        merge_registers(&mut lhs, &rhs);
        assert_eq!(lhs, vec![3, 5, 2, 9]);
        assert_eq!(rhs, vec![3, 1, 2, 9]);
    }

    #[test]
    fn test_update_register_is_monotonic() {
        let mut registers = vec![0u8; 16];
        update_register(&mut registers, 3, 5);
        update_register(&mut registers, 3, 2);
        assert_eq!(registers[3], 5);
        update_register(&mut registers, 3, 6);
        assert_eq!(registers[3], 6);
    }
}
