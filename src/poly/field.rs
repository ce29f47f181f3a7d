//! Polynomials with coefficients in GF(2^m).
//!
//! A [`FieldPoly`] borrows the [`Gf2mField`] its coefficients live in, so the
//! borrow checker guarantees the field outlives every polynomial built from
//! it. Binary operations expect both operands to share one field.

use crate::error::{Error, Result};
use crate::field::{self, Element, Gf2mField};
use crate::poly::BinaryPoly;
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Add, Mul};

/// Polynomial over GF(2^m), constant term first
#[derive(Clone)]
pub struct FieldPoly<'f> {
    field: &'f Gf2mField,
    /// Trimmed so the last stored coefficient, if any, is nonzero
    coeffs: Vec<Element>,
}

impl<'f> FieldPoly<'f> {
    /// The zero polynomial
    pub fn zero(field: &'f Gf2mField) -> Self {
        FieldPoly {
            field,
            coeffs: Vec::new(),
        }
    }

    /// The constant polynomial `1`
    pub fn one(field: &'f Gf2mField) -> Self {
        Self::constant(field, 1)
    }

    /// The constant polynomial `c`
    pub fn constant(field: &'f Gf2mField, c: Element) -> Self {
        Self::from_coefficients(field, vec![c])
    }

    /// `c * x^k`
    pub fn monomial(field: &'f Gf2mField, c: Element, k: usize) -> Self {
        let mut coeffs = vec![0; k + 1];
        coeffs[k] = c;
        Self::from_coefficients(field, coeffs)
    }

    /// `x + root`, which vanishes exactly at `root`
    pub fn linear(field: &'f Gf2mField, root: Element) -> Self {
        Self::from_coefficients(field, vec![root, 1])
    }

    /// Build from coefficients, constant term first. Trailing zeros are dropped.
    pub fn from_coefficients(field: &'f Gf2mField, coeffs: impl Into<Vec<Element>>) -> Self {
        let coeffs = coeffs.into();
        debug_assert!(
            coeffs.iter().all(|&c| field.contains(c)),
            "coefficient outside GF(2^{})",
            field.degree()
        );
        let mut poly = FieldPoly { field, coeffs };
        poly.trim();
        poly
    }

    /// Lift a GF(2) polynomial into GF(2^m)
    pub fn from_binary(field: &'f Gf2mField, poly: &BinaryPoly) -> Self {
        let coeffs: Vec<Element> = poly.as_bits().iter().by_vals().map(Element::from).collect();
        Self::from_coefficients(field, coeffs)
    }

    /// Project onto GF(2) if every coefficient is `0` or `1`
    pub fn to_binary(&self) -> Option<BinaryPoly> {
        if self.coeffs.iter().any(|&c| c > 1) {
            return None;
        }
        let mut poly = BinaryPoly::zero();
        for (i, &c) in self.coeffs.iter().enumerate() {
            poly.set_coeff(i, c == 1);
        }
        Some(poly)
    }

    /// The field the coefficients live in
    pub fn field(&self) -> &'f Gf2mField {
        self.field
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
    pub fn coeff(&self, i: usize) -> Element {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// Leading coefficient; `0` for the zero polynomial
    pub fn leading(&self) -> Element {
        self.coeffs.last().copied().unwrap_or(0)
    }

    /// Coefficients, constant term first, with no trailing zeros
    pub fn coefficients(&self) -> &[Element] {
        &self.coeffs
    }

    /// Set the coefficient of `x^i`, growing or trimming as needed
    pub fn set_coeff(&mut self, i: usize, value: Element) {
        debug_assert!(self.field.contains(value));
        if i >= self.coeffs.len() {
            if value == 0 {
                return;
            }
            self.coeffs.resize(i + 1, 0);
        }
        self.coeffs[i] = value;
        self.trim();
    }

    /// Multiply every coefficient by `c`
    pub fn scale(&self, c: Element) -> Self {
        let coeffs: Vec<Element> = self.coeffs.iter().map(|&a| self.field.mul(a, c)).collect();
        Self::from_coefficients(self.field, coeffs)
    }

    /// Multiply by `x^k`
    pub fn shift(&self, k: usize) -> Self {
        if self.is_zero() {
            return Self::zero(self.field);
        }
        let mut coeffs = vec![0; k];
        coeffs.extend_from_slice(&self.coeffs);
        FieldPoly {
            field: self.field,
            coeffs,
        }
    }

    /// Scale so the leading coefficient is `1`; zero stays zero
    pub fn monic(&self) -> Self {
        match self.leading() {
            0 | 1 => self.clone(),
            lead => self.scale(self.field.inv(lead)),
        }
    }

    /// Evaluate at `x` by Horner's rule
    pub fn eval(&self, x: Element) -> Element {
        self.coeffs
            .iter()
            .rev()
            .fold(0, |acc, &c| field::add(self.field.mul(acc, x), c))
    }

    /// Formal derivative. In characteristic 2 only odd-degree terms survive:
    /// `d/dx x^i = x^(i-1)` for odd `i` and `0` for even `i`.
    pub fn derivative(&self) -> Self {
        let coeffs: Vec<Element> = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();
        Self::from_coefficients(self.field, coeffs)
    }

    /// Long division: returns `(q, r)` with `self = q * divisor + r` and
    /// `deg r < deg divisor`.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if `divisor` is the zero polynomial.
    pub fn div_rem(&self, divisor: &FieldPoly<'f>) -> Result<(FieldPoly<'f>, FieldPoly<'f>)> {
        self.check_field(divisor);
        let divisor_deg = divisor.degree().ok_or(Error::DivisionByZero)?;
        let lead_inv = self.field.inv(divisor.leading());

        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![0; remainder.len().saturating_sub(divisor_deg)];

        while let Some(rem_deg) = remainder.len().checked_sub(1) {
            if rem_deg < divisor_deg {
                break;
            }
            let shift = rem_deg - divisor_deg;
            let factor = self.field.mul(remainder[rem_deg], lead_inv);
            quotient[shift] = factor;
            for (j, &c) in divisor.coeffs.iter().enumerate() {
                remainder[j + shift] ^= self.field.mul(factor, c);
            }
            trim_vec(&mut remainder);
        }

        Ok((
            Self::from_coefficients(self.field, quotient),
            Self::from_coefficients(self.field, remainder),
        ))
    }

    /// Remainder of division by `modulus`
    pub fn rem(&self, modulus: &FieldPoly<'f>) -> Result<FieldPoly<'f>> {
        self.div_rem(modulus).map(|(_, r)| r)
    }

    /// `self * other mod modulus`
    pub fn mul_mod(&self, other: &FieldPoly<'f>, modulus: &FieldPoly<'f>) -> Result<FieldPoly<'f>> {
        (self * other).rem(modulus)
    }

    /// `self^2 mod modulus`, using `(Σ c_i x^i)^2 = Σ c_i^2 x^(2i)`
    pub fn square_mod(&self, modulus: &FieldPoly<'f>) -> Result<FieldPoly<'f>> {
        let mut coeffs = vec![0; self.coeffs.len() * 2];
        for (i, &c) in self.coeffs.iter().enumerate() {
            coeffs[2 * i] = self.field.square(c);
        }
        Self::from_coefficients(self.field, coeffs).rem(modulus)
    }

    /// Square root modulo `modulus`, given `sqrt_x` with `sqrt_x^2 ≡ x`.
    ///
    /// Splits `self = A(x)^2 + x * B(x)^2` coefficient-wise and returns
    /// `A + sqrt_x * B mod modulus`.
    pub fn sqrt_mod(
        &self,
        sqrt_x: &FieldPoly<'f>,
        modulus: &FieldPoly<'f>,
    ) -> Result<FieldPoly<'f>> {
        let half = self.coeffs.len().div_ceil(2);
        let mut even = vec![0; half];
        let mut odd = vec![0; half];
        for (i, &c) in self.coeffs.iter().enumerate() {
            let root = self.field.sqrt(c);
            if i % 2 == 0 {
                even[i / 2] = root;
            } else {
                odd[i / 2] = root;
            }
        }
        let even = Self::from_coefficients(self.field, even);
        let odd = Self::from_coefficients(self.field, odd);
        (&even + &(sqrt_x * &odd)).rem(modulus)
    }

    /// Monic greatest common divisor. `gcd(0, 0) = 0`.
    pub fn gcd(&self, other: &FieldPoly<'f>) -> FieldPoly<'f> {
        self.check_field(other);
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            // b is nonzero, so division cannot fail
            let r = match a.rem(&b) {
                Ok(r) => r,
                Err(_) => break,
            };
            a = std::mem::replace(&mut b, r);
        }
        a.monic()
    }

    /// Monic least common multiple, `a * b / gcd(a, b)`. Zero if either
    /// operand is zero.
    pub fn lcm(&self, other: &FieldPoly<'f>) -> FieldPoly<'f> {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.field);
        }
        let divisor = self.gcd(other);
        match (self * other).div_rem(&divisor) {
            Ok((quotient, _)) => quotient.monic(),
            Err(_) => Self::zero(self.field),
        }
    }

    /// Inverse modulo `modulus` by the extended Euclidean algorithm.
    ///
    /// # Errors
    ///
    /// * `DivisionByZero` if `modulus` is zero
    /// * `NotInvertible` if `self` and `modulus` share a nonconstant factor,
    ///   or `modulus` is a constant
    pub fn inv_mod(&self, modulus: &FieldPoly<'f>) -> Result<FieldPoly<'f>> {
        self.check_field(modulus);
        let modulus_deg = modulus.degree().ok_or(Error::DivisionByZero)?;
        if modulus_deg == 0 {
            return Err(Error::NotInvertible);
        }

        // Invariant: r_i ≡ s_i * self (mod modulus)
        let mut r0 = modulus.clone();
        let mut r1 = self.rem(modulus)?;
        let mut s0 = Self::zero(self.field);
        let mut s1 = Self::one(self.field);

        while !r1.is_zero() {
            let (q, r) = r0.div_rem(&r1)?;
            let s = &s0 + &(&q * &s1);
            r0 = std::mem::replace(&mut r1, r);
            s0 = std::mem::replace(&mut s1, s);
        }

        if r0.degree() != Some(0) {
            return Err(Error::NotInvertible);
        }
        s0.scale(self.field.inv(r0.leading())).rem(modulus)
    }

    /// Irreducibility test over GF(2^m) (Ben-Or): a polynomial `f` of degree
    /// `d` is irreducible iff `gcd(x^(q^i) - x, f) = 1` for `1 <= i <= d/2`,
    /// where `q = 2^m`.
    pub fn is_irreducible(&self) -> bool {
        let degree = match self.degree() {
            None | Some(0) => return false,
            Some(1) => return true,
            Some(d) => d,
        };

        let x = Self::monomial(self.field, 1, 1);
        let mut power = x.clone();
        for _ in 0..degree / 2 {
            // power <- power^q
            for _ in 0..self.field.degree() {
                power = match power.square_mod(self) {
                    Ok(p) => p,
                    Err(_) => return false,
                };
            }
            if self.gcd(&(&power + &x)).degree() != Some(0) {
                return false;
            }
        }
        true
    }

    fn check_field(&self, other: &FieldPoly<'f>) {
        debug_assert!(
            std::ptr::eq(self.field, other.field),
            "polynomials belong to different fields"
        );
    }

    fn trim(&mut self) {
        trim_vec(&mut self.coeffs);
    }
}

fn trim_vec(coeffs: &mut Vec<Element>) {
    while coeffs.last() == Some(&0) {
        coeffs.pop();
    }
}

impl<'f> Add for &FieldPoly<'f> {
    type Output = FieldPoly<'f>;

    fn add(self, rhs: Self) -> FieldPoly<'f> {
        self.check_field(rhs);
        let (long, short) = if self.coeffs.len() >= rhs.coeffs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut coeffs = long.coeffs.clone();
        for (c, &s) in coeffs.iter_mut().zip(&short.coeffs) {
            *c = field::add(*c, s);
        }
        FieldPoly::from_coefficients(self.field, coeffs)
    }
}

impl<'f> Mul for &FieldPoly<'f> {
    type Output = FieldPoly<'f>;

    fn mul(self, rhs: Self) -> FieldPoly<'f> {
        self.check_field(rhs);
        let (Some(da), Some(db)) = (self.degree(), rhs.degree()) else {
            return FieldPoly::zero(self.field);
        };

        let mut coeffs = vec![0; da + db + 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] ^= self.field.mul(a, b);
            }
        }
        FieldPoly::from_coefficients(self.field, coeffs)
    }
}

impl PartialEq for FieldPoly<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs
    }
}

impl Eq for FieldPoly<'_> {}

impl Debug for FieldPoly<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPoly")
            .field("degree", &self.field.degree())
            .field("coeffs", &self.coeffs)
            .finish()
    }
}

impl Display for FieldPoly<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms: Vec<String> = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, &c)| c != 0)
            .map(|(i, &c)| match (i, c) {
                (0, c) => format!("{:#x}", c),
                (1, 1) => "x".to_string(),
                (1, c) => format!("{:#x}*x", c),
                (i, 1) => format!("x^{}", i),
                (i, c) => format!("{:#x}*x^{}", c, i),
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}
