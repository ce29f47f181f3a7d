//! Polynomials over GF(2) with bit-packed coefficients.
//!
//! Coefficient `i` is bit `i` of a `BitVec<u64, Lsb0>`, so addition is a
//! word-wise XOR and multiplication walks only the set bits.

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul};

/// Polynomial with coefficients in GF(2)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BinaryPoly {
    /// Trimmed so the last stored bit, if any, is set
    coeffs: BitVec<u64, Lsb0>,
}

impl BinaryPoly {
    /// The zero polynomial
    pub fn zero() -> Self {
        Self::default()
    }

    /// The constant polynomial `1`
    pub fn one() -> Self {
        Self::monomial(0)
    }

    /// `x^k`
    pub fn monomial(k: usize) -> Self {
        let mut coeffs = bitvec![u64, Lsb0; 0; k + 1];
        coeffs.set(k, true);
        BinaryPoly { coeffs }
    }

    /// Build from coefficient bits, constant term first
    pub fn from_bits<O: BitOrder, T: BitStore>(bits: &BitSlice<T, O>) -> Self {
        let mut coeffs = BitVec::<u64, Lsb0>::with_capacity(bits.len());
        coeffs.extend(bits.iter().by_vals());
        let mut poly = BinaryPoly { coeffs };
        poly.trim();
        poly
    }

    /// Build from the exponents of the nonzero terms; repeated exponents cancel
    pub fn from_exponents(exponents: &[usize]) -> Self {
        let mut poly = Self::zero();
        for &e in exponents {
            poly.toggle(e);
        }
        poly
    }

    /// Build from a packed integer, bit `i` giving the coefficient of `x^i`
    pub fn from_u64(value: u64) -> Self {
        let mut coeffs = BitVec::<u64, Lsb0>::from_element(value);
        coeffs.truncate(64 - value.leading_zeros() as usize);
        BinaryPoly { coeffs }
    }

    /// Degree, or `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Whether this is the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Coefficient of `x^i`
    pub fn coeff(&self, i: usize) -> bool {
        self.coeffs.get(i).map_or(false, |bit| *bit)
    }

    /// Set the coefficient of `x^i`, growing or trimming as needed
    pub fn set_coeff(&mut self, i: usize, value: bool) {
        if i >= self.coeffs.len() {
            if !value {
                return;
            }
            self.coeffs.resize(i + 1, false);
        }
        self.coeffs.set(i, value);
        self.trim();
    }

    /// Number of nonzero coefficients
    pub fn weight(&self) -> usize {
        self.coeffs.count_ones()
    }

    /// Coefficient bits, constant term first, with no trailing zeros
    pub fn as_bits(&self) -> &BitSlice<u64, Lsb0> {
        &self.coeffs
    }

    /// Multiply by `x^k`
    pub fn shift(&self, k: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut coeffs = bitvec![u64, Lsb0; 0; k];
        coeffs.extend_from_bitslice(&self.coeffs);
        BinaryPoly { coeffs }
    }

    /// Long division: returns `(q, r)` with `self = q * divisor + r` and
    /// `deg r < deg divisor`.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if `divisor` is the zero polynomial.
    pub fn div_rem(&self, divisor: &BinaryPoly) -> Result<(BinaryPoly, BinaryPoly)> {
        let divisor_deg = divisor.degree().ok_or(Error::DivisionByZero)?;

        let mut remainder = self.coeffs.clone();
        let mut quotient = BinaryPoly::zero();

        while let Some(rem_deg) = remainder.last_one() {
            if rem_deg < divisor_deg {
                break;
            }
            let shift = rem_deg - divisor_deg;
            for j in divisor.coeffs.iter_ones() {
                let bit = remainder[j + shift];
                remainder.set(j + shift, !bit);
            }
            quotient.toggle(shift);
        }

        let mut remainder = BinaryPoly { coeffs: remainder };
        remainder.trim();
        Ok((quotient, remainder))
    }

    /// Remainder of division by `modulus`
    pub fn rem(&self, modulus: &BinaryPoly) -> Result<BinaryPoly> {
        self.div_rem(modulus).map(|(_, r)| r)
    }

    /// Greatest common divisor by the Euclidean algorithm. `gcd(0, 0) = 0`.
    pub fn gcd(&self, other: &BinaryPoly) -> BinaryPoly {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            // b is nonzero, so division cannot fail
            let r = match a.div_rem(&b) {
                Ok((_, r)) => r,
                Err(_) => break,
            };
            a = std::mem::replace(&mut b, r);
        }
        a
    }

    fn toggle(&mut self, i: usize) {
        if i >= self.coeffs.len() {
            self.coeffs.resize(i + 1, false);
        }
        let bit = self.coeffs[i];
        self.coeffs.set(i, !bit);
        self.trim();
    }

    fn trim(&mut self) {
        let len = self.coeffs.last_one().map_or(0, |d| d + 1);
        self.coeffs.truncate(len);
    }
}

impl Add for &BinaryPoly {
    type Output = BinaryPoly;

    fn add(self, rhs: Self) -> BinaryPoly {
        let (long, short) = if self.coeffs.len() >= rhs.coeffs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut coeffs = long.coeffs.clone();
        coeffs[..short.coeffs.len()] ^= short.coeffs.as_bitslice();
        let mut sum = BinaryPoly { coeffs };
        sum.trim();
        sum
    }
}

impl Mul for &BinaryPoly {
    type Output = BinaryPoly;

    fn mul(self, rhs: Self) -> BinaryPoly {
        let (Some(da), Some(db)) = (self.degree(), rhs.degree()) else {
            return BinaryPoly::zero();
        };

        let mut coeffs = bitvec![u64, Lsb0; 0; da + db + 1];
        for i in self.coeffs.iter_ones() {
            for j in rhs.coeffs.iter_ones() {
                let bit = coeffs[i + j];
                coeffs.set(i + j, !bit);
            }
        }
        let mut product = BinaryPoly { coeffs };
        product.trim();
        product
    }
}

impl Display for BinaryPoly {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms: Vec<String> = self
            .coeffs
            .iter_ones()
            .rev()
            .map(|i| match i {
                0 => "1".to_string(),
                1 => "x".to_string(),
                _ => format!("x^{}", i),
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}
