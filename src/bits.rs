//! Bit buffers exchanged with codec callers.
//!
//! Bits are numbered least-significant-bit first within each byte, so bit `i`
//! of a buffer lives in byte `i / 8` at mask `1 << (i % 8)`.

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Owned, LSB-first bit buffer
pub type BitBuffer = BitVec<u8, Lsb0>;

/// Borrowed, LSB-first bit slice
pub type Bits = BitSlice<u8, Lsb0>;

/// View the first `bit_count` bits of `bytes`.
///
/// # Errors
///
/// Returns `InvalidParameter` if `bytes` holds fewer than `bit_count` bits.
pub fn view(bytes: &[u8], bit_count: usize) -> Result<&Bits> {
    let available = bytes.len() * 8;
    if bit_count > available {
        return Err(Error::InvalidParameter(format!(
            "bit count {} exceeds the {} bits in the buffer",
            bit_count, available
        )));
    }
    Ok(&bytes.view_bits::<Lsb0>()[..bit_count])
}

/// Number of bytes needed to hold `bit_count` bits
pub fn bytes_needed(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

/// Copy `bits` into the front of `out`, zero-filling the padding bits of the
/// last byte. Returns the number of bits written.
///
/// # Errors
///
/// Returns `BufferTooSmall` without touching `out` if it cannot hold `bits`.
pub fn copy_into(bits: &Bits, out: &mut [u8]) -> Result<usize> {
    let needed = bytes_needed(bits.len());
    if out.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    out[..needed].fill(0);
    out.view_bits_mut::<Lsb0>()[..bits.len()].copy_from_bitslice(bits);
    Ok(bits.len())
}

/// Pack bits into bytes; padding bits in the last byte are zero.
pub fn to_bytes(bits: &Bits) -> Vec<u8> {
    let mut owned = BitBuffer::from_bitslice(bits);
    owned.set_uninitialized(false);
    owned.into_vec()
}
