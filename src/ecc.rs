//! Algebraic error-correcting codes over GF(2^m).
//!
//! This module provides:
//! - BCH codes: generator from minimal polynomials, systematic encoding,
//!   Berlekamp-Massey / Chien search decoding
//! - Binary Goppa codes: parity-check construction, systematic encoding by
//!   Gaussian elimination, Patterson decoding
//!
//! Both implement [`Codec`], the common encode/decode contract. Codewords are
//! LSB-first bit buffers laid out as `message || parity`.
//!
//! # Examples
//!
//! ```rust
//! use galois_ecc::ecc::{bch::{BchCode, BchParams}, Codec};
//!
//! let code = BchCode::new(BchParams::new(4, 2)).unwrap();
//! let message = galois_ecc::bits::view(&[0b0101_0011], 7).unwrap();
//!
//! let mut received = code.encode(message).unwrap();
//! let flipped = !received[3];
//! received.set(3, flipped);
//!
//! let decoded = code.decode(&received).unwrap();
//! assert_eq!(decoded.corrections, 1);
//! assert_eq!(decoded.message(), message);
//! ```

use crate::bits::{self, BitBuffer, Bits};
use crate::error::Result;

/// Outcome of a successful decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Corrected codeword (any bits past the codeword are passed through)
    pub bits: BitBuffer,
    /// Number of bit errors corrected
    pub corrections: usize,
    /// Length of the message prefix of `bits`
    pub message_len: usize,
}

impl Decoded {
    /// The recovered message bits
    pub fn message(&self) -> &Bits {
        &self.bits[..self.message_len]
    }
}

/// Encode/decode contract shared by the codecs
pub trait Codec {
    /// Short identifier of the code family
    fn name(&self) -> &'static str;

    /// Message bits carried by one codeword (`k`)
    fn message_len(&self) -> usize;

    /// Bits in one codeword (`n`)
    fn codeword_len(&self) -> usize;

    /// Encode a message of at most `message_len()` bits into a codeword
    fn encode(&self, message: &Bits) -> Result<BitBuffer>;

    /// Correct a received word of at least `codeword_len()` bits
    fn decode(&self, received: &Bits) -> Result<Decoded>;

    /// Encode into a caller buffer, returning the number of bits written.
    ///
    /// # Errors
    ///
    /// Everything `encode` returns, plus `BufferTooSmall` (with `out`
    /// untouched) when `out` cannot hold the codeword.
    fn encode_into(&self, message: &Bits, out: &mut [u8]) -> Result<usize> {
        let codeword = self.encode(message)?;
        bits::copy_into(&codeword, out)
    }

    /// Decode into a caller buffer, returning `(bits written, corrections)`.
    fn decode_into(&self, received: &Bits, out: &mut [u8]) -> Result<(usize, usize)> {
        let decoded = self.decode(received)?;
        let written = bits::copy_into(&decoded.bits, out)?;
        Ok((written, decoded.corrections))
    }
}

/// BCH codes
pub mod bch;
pub use bch::{bch_decode, bch_encode, BchCode, BchParams};

/// Binary Goppa codes
pub mod goppa;
pub use goppa::{random_goppa_polynomial, GoppaCode};
