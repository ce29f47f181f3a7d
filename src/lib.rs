//! Finite-field arithmetic over GF(2^m), polynomial algebra over GF(2) and
//! GF(2^m), and the BCH and binary Goppa error-correcting codes built on them.

pub mod bits;
pub mod ecc;
pub mod error;
pub mod field;
pub mod linalg;
pub mod poly;

pub use ecc::{Codec, Decoded};
pub use error::{Error, ErrorKind, Result};
pub use field::Gf2mField;
