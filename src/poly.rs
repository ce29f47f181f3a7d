//! Polynomial algebra over GF(2) and over GF(2^m).
//!
//! Two separate types keep the coefficient domains apart:
//!
//! - [`BinaryPoly`]: bit-packed coefficients in GF(2)
//! - [`FieldPoly`]: coefficients in a borrowed [`Gf2mField`](crate::field::Gf2mField)
//!
//! Neither type ever stores a zero leading coefficient, so `degree()` is
//! always the index of the highest nonzero coefficient, or `None` for the
//! zero polynomial.

pub mod binary;
pub mod field;

pub use binary::BinaryPoly;
pub use field::FieldPoly;
