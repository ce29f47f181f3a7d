//! BCH (Bose-Chaudhuri-Hocquenghem) error correction code implementation.
//!
//! Binary, narrow-sense, primitive BCH codes of length `n = 2^m - 1` that
//! correct up to `t` bit errors per codeword.
//!
//! - The generator is the LCM of the minimal polynomials of `α, α^3, ...,
//!   α^(2t-1)`, each built from its conjugacy class over GF(2)
//! - Encoding is systematic: the codeword is `message (k bits) || parity (r
//!   bits)` with `parity = x^r · m(x) mod g(x)`
//! - Decoding computes `S_1..S_2t`, finds the error locator with
//!   Berlekamp-Massey and its roots with a Chien search
//!
//! The wire word is a cyclic shift of `x^r · m(x) + parity(x)`, so it is
//! itself a codeword and wire bit `i` is read as the coefficient of `x^i`.

use crate::bits::{BitBuffer, Bits};
use crate::ecc::{Codec, Decoded};
use crate::error::{Error, Result};
use crate::field::{self, Element, Gf2mField};
use crate::poly::{BinaryPoly, FieldPoly};
use std::fmt::{Display, Formatter};

/// Parameters of a binary BCH code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BchParams {
    /// Field degree (code works in GF(2^m))
    pub m: u32,
    /// Number of errors the code can correct
    pub t: usize,
    /// Primitive modulus; `None` selects [`field::DEFAULT_MODULI`]
    pub modulus: Option<u32>,
}

impl BchParams {
    /// Parameters with the default modulus for `m`
    pub fn new(m: u32, t: usize) -> Self {
        BchParams {
            m,
            t,
            modulus: None,
        }
    }

    /// Use an explicit primitive modulus
    pub fn with_modulus(mut self, modulus: u32) -> Self {
        self.modulus = Some(modulus);
        self
    }
}

/// BCH code with its field and generator polynomial
#[derive(Debug)]
pub struct BchCode {
    field: Gf2mField,
    /// Code length (n = 2^m - 1)
    n: usize,
    /// Message bits per codeword (k = n - deg g)
    k: usize,
    /// Maximum number of errors that can be corrected
    t: usize,
    generator: BinaryPoly,
}

impl BchCode {
    /// Build the field and generator polynomial for a BCH code
    ///
    /// # Arguments
    ///
    /// * `params` - field degree, correction capability and optional modulus
    ///
    /// # Errors
    ///
    /// * `InvalidParameter` if `t` is zero, `t > (n - 1) / 2`, `m` is out of
    ///   range, or the generator leaves no room for message bits
    /// * `NotPrimitive` if an explicit modulus is not primitive
    pub fn new(params: BchParams) -> Result<Self> {
        let field = match params.modulus {
            Some(modulus) => Gf2mField::new(params.m, modulus)?,
            None => Gf2mField::with_default_modulus(params.m)?,
        };
        let n = field.order();
        let t = params.t;

        if t == 0 {
            return Err(Error::invalid("error correction capability must be positive"));
        }
        if t > n / 2 {
            return Err(Error::InvalidParameter(format!(
                "error correction capability too large: max is {}, got {}",
                n / 2,
                t
            )));
        }

        let generator = build_generator(&field, t)?;
        let r = generator.degree().unwrap_or(0);
        if r >= n {
            return Err(Error::InvalidParameter(format!(
                "generator degree {} leaves no message bits in a length-{} code",
                r, n
            )));
        }

        let code = BchCode {
            field,
            n,
            k: n - r,
            t,
            generator,
        };
        log::debug!("built {} with generator {}", code, code.generator);
        Ok(code)
    }

    /// Codeword length `n`
    pub fn n(&self) -> usize {
        self.n
    }

    /// Message length `k`
    pub fn k(&self) -> usize {
        self.k
    }

    /// Correction capability `t`
    pub fn t(&self) -> usize {
        self.t
    }

    /// Number of parity bits `r = n - k`
    pub fn parity_len(&self) -> usize {
        self.n - self.k
    }

    /// Generator polynomial over GF(2)
    pub fn generator(&self) -> &BinaryPoly {
        &self.generator
    }

    /// The field the code is defined over
    pub fn field(&self) -> &Gf2mField {
        &self.field
    }

    /// Systematically encode up to `k` message bits.
    ///
    /// Shorter messages are zero-padded to `k` bits; the output is always
    /// `n` bits long.
    ///
    /// # Errors
    ///
    /// Returns `InputTooLarge` if `message` has more than `k` bits.
    pub fn encode(&self, message: &Bits) -> Result<BitBuffer> {
        if message.len() > self.k {
            return Err(Error::InputTooLarge {
                length: message.len(),
                max_length: self.k,
            });
        }

        let r = self.parity_len();
        let parity = BinaryPoly::from_bits(message)
            .shift(r)
            .rem(&self.generator)?;

        let mut codeword = BitBuffer::with_capacity(self.n);
        codeword.extend_from_bitslice(message);
        codeword.resize(self.k, false);
        codeword.extend((0..r).map(|i| parity.coeff(i)));
        Ok(codeword)
    }

    /// Correct up to `t` bit errors in the first `n` bits of `received`.
    ///
    /// Bits past the codeword are copied through unchanged.
    ///
    /// # Errors
    ///
    /// * `InputTooShort` if `received` has fewer than `n` bits
    /// * `Uncorrectable` if the error locator is inconsistent with at most
    ///   `t` errors
    pub fn decode(&self, received: &Bits) -> Result<Decoded> {
        if received.len() < self.n {
            return Err(Error::InputTooShort {
                length: received.len(),
                min_length: self.n,
            });
        }

        let word = &received[..self.n];
        let syndromes = self.syndromes(word);
        log::trace!("syndromes {:?}", syndromes);

        if syndromes.iter().all(|&s| s == 0) {
            return Ok(Decoded {
                bits: received.to_bitvec(),
                corrections: 0,
                message_len: self.k,
            });
        }

        let (locator, errors) = self.berlekamp_massey(&syndromes);
        if errors > self.t {
            return Err(Error::Uncorrectable(format!(
                "error locator implies {} errors, code corrects {}",
                errors, self.t
            )));
        }

        let positions = self.chien_search(&locator);
        log::trace!("locator {} has roots at {:?}", locator, positions);
        if Some(positions.len()) != locator.degree() || positions.len() > self.t {
            return Err(Error::Uncorrectable(format!(
                "located {} roots for an error locator of degree {:?}",
                positions.len(),
                locator.degree()
            )));
        }

        let mut bits = received.to_bitvec();
        for &i in &positions {
            let flipped = !bits[i];
            bits.set(i, flipped);
        }

        Ok(Decoded {
            bits,
            corrections: positions.len(),
            message_len: self.k,
        })
    }

    /// `S_1..S_2t` with `S_j = r(α^j)`; even ones come from `S_2i = S_i^2`.
    fn syndromes(&self, word: &Bits) -> Vec<Element> {
        let mut syndromes = vec![0; 2 * self.t];
        for j in (1..=2 * self.t).step_by(2) {
            syndromes[j - 1] = word
                .iter_ones()
                .fold(0, |acc, i| field::add(acc, self.field.alpha_pow(i * j)));
        }
        for j in (2..=2 * self.t).step_by(2) {
            syndromes[j - 1] = self.field.square(syndromes[j / 2 - 1]);
        }
        syndromes
    }

    /// Berlekamp-Massey: shortest LFSR generating the syndrome sequence.
    ///
    /// Returns the error locator `Λ(x)` and the register length `L`.
    fn berlekamp_massey(&self, syndromes: &[Element]) -> (FieldPoly<'_>, usize) {
        let field = &self.field;
        let mut locator = FieldPoly::one(field);
        let mut history = FieldPoly::one(field);
        let mut length = 0usize;
        let mut shift = 1usize;
        let mut last_discrepancy: Element = 1;

        for step in 0..syndromes.len() {
            let discrepancy = (1..=length.min(step)).fold(syndromes[step], |d, i| {
                field::add(d, field.mul(locator.coeff(i), syndromes[step - i]))
            });

            if discrepancy == 0 {
                shift += 1;
                continue;
            }

            let factor = field.mul(discrepancy, field.inv(last_discrepancy));
            let correction = history.scale(factor).shift(shift);
            let previous = locator.clone();
            locator = &locator + &correction;

            if 2 * length <= step {
                length = step + 1 - length;
                history = previous;
                last_discrepancy = discrepancy;
                shift = 1;
            } else {
                shift += 1;
            }
        }

        (locator, length)
    }

    /// Positions `i` in `[0, n)` with `Λ(α^-i) = 0`
    fn chien_search(&self, locator: &FieldPoly<'_>) -> Vec<usize> {
        (0..self.n)
            .filter(|&i| locator.eval(self.field.alpha_pow((self.n - i) % self.n)) == 0)
            .collect()
    }
}

/// LCM of the minimal polynomials of `α^i` for odd `i < 2t`.
fn build_generator(field: &Gf2mField, t: usize) -> Result<BinaryPoly> {
    let order = field.order();
    let mut covered = vec![false; order];
    let mut generator = FieldPoly::one(field);

    for i in (1..2 * t).step_by(2) {
        if covered[i] {
            continue;
        }
        // Walk the conjugacy class i, 2i, 4i, ... mod order
        let mut minimal = FieldPoly::one(field);
        let mut j = i;
        loop {
            covered[j] = true;
            minimal = &minimal * &FieldPoly::linear(field, field.alpha_pow(j));
            j = (2 * j) % order;
            if j == i {
                break;
            }
        }
        generator = generator.lcm(&minimal);
    }

    generator.to_binary().ok_or_else(|| {
        Error::invalid("generator polynomial has coefficients outside GF(2)")
    })
}

impl Codec for BchCode {
    fn name(&self) -> &'static str {
        "bch"
    }

    fn message_len(&self) -> usize {
        self.k
    }

    fn codeword_len(&self) -> usize {
        self.n
    }

    fn encode(&self, message: &Bits) -> Result<BitBuffer> {
        BchCode::encode(self, message)
    }

    fn decode(&self, received: &Bits) -> Result<Decoded> {
        BchCode::decode(self, received)
    }
}

impl Display for BchCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BCH({},{},{}) over GF(2^{})",
            self.n,
            self.k,
            self.t,
            self.field.degree()
        )
    }
}

/// Encode a message with a BCH code built from `params`
pub fn bch_encode(message: &Bits, params: BchParams) -> Result<BitBuffer> {
    BchCode::new(params)?.encode(message)
}

/// Decode a received word with a BCH code built from `params`
pub fn bch_decode(received: &Bits, params: BchParams) -> Result<Decoded> {
    BchCode::new(params)?.decode(received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;
    use crate::error::ErrorKind;
    use bitvec::prelude::*;

    fn flip(bits: &mut BitBuffer, positions: &[usize]) {
        for &i in positions {
            let flipped = !bits[i];
            bits.set(i, flipped);
        }
    }

    #[test]
    fn test_bch_code_creation() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        assert_eq!(code.n(), 15);
        assert_eq!(code.k(), 7);
        assert_eq!(code.t(), 2);
        assert_eq!(code.parity_len(), 8);
        // (x^4 + x + 1)(x^4 + x^3 + x^2 + x + 1)
        assert_eq!(code.generator(), &BinaryPoly::from_u64(0x1D1));
        assert_eq!(code.to_string(), "BCH(15,7,2) over GF(2^4)");
    }

    #[test]
    fn test_standard_bch_codes() {
        let code = BchCode::new(BchParams::new(4, 3)).unwrap();
        assert_eq!((code.n(), code.k()), (15, 5));

        let code = BchCode::new(BchParams::new(5, 2)).unwrap();
        assert_eq!((code.n(), code.k()), (31, 21));

        let code = BchCode::new(BchParams::new(5, 3)).unwrap();
        assert_eq!((code.n(), code.k()), (31, 16));

        let code = BchCode::new(BchParams::new(6, 3)).unwrap();
        assert_eq!((code.n(), code.k()), (63, 45));

        // every odd power shares a conjugacy class once t is large
        let code = BchCode::new(BchParams::new(4, 7)).unwrap();
        assert_eq!(code.k(), 1);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            BchCode::new(BchParams::new(4, 0)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            BchCode::new(BchParams::new(4, 8)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            BchCode::new(BchParams::new(1, 1)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            BchCode::new(BchParams::new(17, 1)),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(
            BchCode::new(BchParams::new(4, 2).with_modulus(0x1F)).unwrap_err(),
            Error::NotPrimitive {
                degree: 4,
                modulus: 0x1F
            }
        );
    }

    #[test]
    fn test_encode_known_codeword() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        // m(x) = 1: parity = x^8 mod g = x^7 + x^6 + x^4 + 1
        let message = bitvec![u8, Lsb0; 1, 0, 0, 0, 0, 0, 0];
        let codeword = code.encode(&message).unwrap();
        assert_eq!(codeword.len(), 15);
        assert_eq!(codeword.iter_ones().collect::<Vec<_>>(), vec![0, 7, 11, 13, 14]);

        let zero = code.encode(&bitvec![u8, Lsb0; 0; 7]).unwrap();
        assert!(zero.not_any());
    }

    #[test]
    fn test_encode_pads_short_message() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let short = bitvec![u8, Lsb0; 1, 1, 0];
        let mut padded = short.clone();
        padded.resize(7, false);

        assert_eq!(code.encode(&short).unwrap(), code.encode(&padded).unwrap());
        assert_eq!(code.encode(&BitBuffer::new()).unwrap().len(), 15);
    }

    #[test]
    fn test_message_too_long() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bitvec![u8, Lsb0; 1; 8];
        assert_eq!(
            code.encode(&message).unwrap_err(),
            Error::InputTooLarge {
                length: 8,
                max_length: 7
            }
        );
    }

    #[test]
    fn test_encode_decode_no_errors() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bits::view(&[0xA5], 7).unwrap();
        let encoded = code.encode(message).unwrap();

        let decoded = code.decode(&encoded).unwrap();
        assert_eq!(decoded.corrections, 0);
        assert_eq!(decoded.bits, encoded);
        assert_eq!(decoded.message(), message);
    }

    #[test]
    fn test_single_errors_everywhere() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bits::view(&[0x5A], 7).unwrap();
        let encoded = code.encode(message).unwrap();

        for i in 0..15 {
            let mut corrupted = encoded.clone();
            flip(&mut corrupted, &[i]);
            let decoded = code.decode(&corrupted).unwrap();
            assert_eq!(decoded.corrections, 1, "error at {}", i);
            assert_eq!(decoded.bits, encoded);
        }
    }

    #[test]
    fn test_double_errors_everywhere() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bits::view(&[0x33], 7).unwrap();
        let encoded = code.encode(message).unwrap();

        for i in 0..15 {
            for j in i + 1..15 {
                let mut corrupted = encoded.clone();
                flip(&mut corrupted, &[i, j]);
                let decoded = code.decode(&corrupted).unwrap();
                assert_eq!(decoded.corrections, 2);
                assert_eq!(decoded.message(), message);
            }
        }
    }

    #[test]
    fn test_larger_field() {
        let code = BchCode::new(BchParams::new(5, 3)).unwrap();
        let message = bits::view(&[0xC3, 0x96], 16).unwrap();
        let encoded = code.encode(message).unwrap();

        let mut corrupted = encoded.clone();
        flip(&mut corrupted, &[0, 15, 30]);
        let decoded = code.decode(&corrupted).unwrap();
        assert_eq!(decoded.corrections, 3);
        assert_eq!(decoded.bits, encoded);
    }

    #[test]
    fn test_too_many_errors() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bits::view(&[0x0F], 7).unwrap();
        let encoded = code.encode(message).unwrap();

        let mut corrupted = encoded.clone();
        flip(&mut corrupted, &[1, 5, 9]);
        // three errors exceed the design distance: the decoder either gives
        // up or lands on a different codeword, but never panics
        match code.decode(&corrupted) {
            Err(e) => assert_eq!(e.kind(), ErrorKind::Uncorrectable),
            Ok(decoded) => {
                assert!(decoded.corrections <= 2);
                assert_ne!(decoded.bits, encoded);
            }
        }
    }

    #[test]
    fn test_received_too_short() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let received = bitvec![u8, Lsb0; 0; 14];
        assert_eq!(
            code.decode(&received).unwrap_err(),
            Error::InputTooShort {
                length: 14,
                min_length: 15
            }
        );
    }

    #[test]
    fn test_trailing_bits_pass_through() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bits::view(&[0x21], 7).unwrap();
        let mut received = code.encode(message).unwrap();
        received.extend([true, false, true]);
        flip(&mut received, &[4]);

        let decoded = code.decode(&received).unwrap();
        assert_eq!(decoded.corrections, 1);
        assert_eq!(decoded.bits.len(), 18);
        assert_eq!(&decoded.bits[15..], bitvec![u8, Lsb0; 1, 0, 1].as_bitslice());
        assert_eq!(decoded.message(), message);
    }

    #[test]
    fn test_codec_buffers() {
        let code = BchCode::new(BchParams::new(4, 2)).unwrap();
        let message = bits::view(&[0x7F], 7).unwrap();

        let mut out = [0u8; 2];
        assert_eq!(code.encode_into(message, &mut out).unwrap(), 15);
        let received = bits::view(&out, 15).unwrap();
        let mut decoded = [0u8; 2];
        assert_eq!(code.decode_into(received, &mut decoded).unwrap(), (15, 0));
        assert_eq!(decoded, out);

        let mut small = [0u8; 1];
        assert_eq!(
            code.encode_into(message, &mut small).unwrap_err().kind(),
            ErrorKind::BufferTooSmall
        );
        assert_eq!(small, [0]);
        assert_eq!(Codec::name(&code), "bch");
    }

    #[test]
    fn test_free_functions() {
        let params = BchParams::new(5, 2);
        let message = bits::view(&[0x12, 0x34, 0x05], 21).unwrap();
        let mut encoded = bch_encode(message, params).unwrap();
        assert_eq!(encoded.len(), 31);

        flip(&mut encoded, &[2, 27]);
        let decoded = bch_decode(&encoded, params).unwrap();
        assert_eq!(decoded.corrections, 2);
        assert_eq!(decoded.message(), message);
    }
}
