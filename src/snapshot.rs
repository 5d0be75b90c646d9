//! # Snapshot format
//!
//! `dump` writes the full state of a `CardinalityEstimator` into a byte stream and
//! `restore` rebuilds an identical estimator from it. Only the precision and the
//! registers are stored; the bias correction constant is derived again on restore.
//!
//! Layout, every field a single byte so byte order never matters:
//! - byte 0            - format version (`SNAPSHOT_VERSION`)
//! - byte 1            - precision `P` in [4..16] range
//! - bytes 2..2 + M    - `M = 2^P` registers in index order, each in [0..33 - P] range
//!
//! `restore` reads exactly `2 + M` bytes and leaves the rest of the stream untouched,
//! so snapshots may be concatenated. `from_bytes` additionally rejects trailing bytes.

use std::io::{Read, Write};

use crate::error::{FormatError, Result};
use crate::estimator::{validate_precision, CardinalityEstimator};
use crate::hash::Hash32;
use crate::hyperloglog::max_rank;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u8 = 1;
/// Number of bytes preceding the registers
const HEADER_LEN: usize = 2;

impl<H: Hash32> CardinalityEstimator<H> {
    /// Write snapshot of `CardinalityEstimator` into `writer`
    pub fn dump<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[SNAPSHOT_VERSION, self.precision])?;
        writer.write_all(&self.registers)?;
        Ok(())
    }

    /// Return snapshot of `CardinalityEstimator` as bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.registers.len());
        bytes.push(SNAPSHOT_VERSION);
        bytes.push(self.precision);
        bytes.extend_from_slice(&self.registers);
        bytes
    }

    /// Create new `CardinalityEstimator` from snapshot read from `reader`
    pub fn restore<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut header = Vec::with_capacity(HEADER_LEN);
        Read::take(&mut *reader, HEADER_LEN as u64).read_to_end(&mut header)?;
        if header.len() < HEADER_LEN {
            return Err(FormatError::Truncated {
                expected: HEADER_LEN,
                actual: header.len(),
            }
            .into());
        }

        let precision = check_header(header[0], header[1])?;
        let m = 1usize << precision;

        let mut registers = Vec::with_capacity(m);
        Read::take(&mut *reader, m as u64).read_to_end(&mut registers)?;
        Self::from_snapshot_parts(precision, registers)
    }

    /// Create new `CardinalityEstimator` from decoded precision and registers,
    /// validating that they describe a reachable state
    pub(crate) fn from_snapshot_parts(precision: u8, registers: Vec<u8>) -> Result<Self> {
        validate_precision(precision).map_err(|_| FormatError::InvalidPrecision(precision))?;
        let m = 1usize << precision;
        if registers.len() < m {
            return Err(FormatError::Truncated {
                expected: HEADER_LEN + m,
                actual: HEADER_LEN + registers.len(),
            }
            .into());
        }
        if registers.len() > m {
            return Err(FormatError::TrailingBytes(registers.len() - m).into());
        }
        check_registers(&registers, precision)?;

        Ok(Self::from_parts(precision, registers.into_boxed_slice()))
    }

    /// Create new `CardinalityEstimator` from snapshot bytes produced by `to_bytes` or `dump`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let estimator = Self::restore(&mut reader)?;
        if !reader.is_empty() {
            return Err(FormatError::TrailingBytes(reader.len()).into());
        }
        Ok(estimator)
    }
}

/// Validate version and precision bytes, returning the precision
fn check_header(version: u8, precision: u8) -> Result<u8> {
    if version != SNAPSHOT_VERSION {
        return Err(FormatError::UnsupportedVersion(version).into());
    }
    validate_precision(precision).map_err(|_| FormatError::InvalidPrecision(precision))?;
    Ok(precision)
}

/// Ensure every register holds a rank reachable for `precision`
fn check_registers(registers: &[u8], precision: u8) -> std::result::Result<(), FormatError> {
    let max = max_rank(precision);
    match registers.iter().position(|&r| r > max) {
        Some(index) => Err(FormatError::RegisterOutOfRange {
            index,
            value: registers[index],
            max,
        }),
        None => Ok(()),
    }
}
