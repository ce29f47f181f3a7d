//! Error types shared by the field engine, the polynomial algebras and the codecs.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], as reported to codec callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range parameters, or input of the wrong size
    InvalidParameter,
    /// A caller-provided output buffer cannot hold the result
    BufferTooSmall,
    /// The received word carries more errors than the code can correct
    Uncorrectable,
    /// The requested operation has no valid algorithm for these parameters
    NotSupported,
}

/// Errors raised by field construction, polynomial arithmetic and coding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or out-of-range parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input is longer than the code accepts
    #[error("input too large: {length} bits (maximum {max_length})")]
    InputTooLarge { length: usize, max_length: usize },

    /// Input is shorter than one codeword
    #[error("input too short: {length} bits (minimum {min_length})")]
    InputTooShort { length: usize, min_length: usize },

    /// The modulus does not generate the full multiplicative group
    #[error("modulus {modulus:#x} is not primitive for GF(2^{degree})")]
    NotPrimitive { degree: u32, modulus: u32 },

    /// Division by the zero polynomial
    #[error("division by the zero polynomial")]
    DivisionByZero,

    /// The polynomial shares a factor with the modulus
    #[error("polynomial is not invertible modulo the given modulus")]
    NotInvertible,

    /// A support element is a root of the Goppa polynomial
    #[error("support element {index} ({element:#x}) is a root of the Goppa polynomial")]
    InvalidSupport { index: usize, element: u16 },

    /// Output buffer cannot hold the result
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Too many errors to correct
    #[error("uncorrectable: {0}")]
    Uncorrectable(String),

    /// No algorithm is available for this configuration
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// Classify this error into the codec error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter(_)
            | Error::InputTooLarge { .. }
            | Error::InputTooShort { .. }
            | Error::NotPrimitive { .. }
            | Error::DivisionByZero
            | Error::InvalidSupport { .. } => ErrorKind::InvalidParameter,
            Error::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Error::NotInvertible | Error::Uncorrectable(_) => ErrorKind::Uncorrectable,
            Error::NotSupported(_) => ErrorKind::NotSupported,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::InputTooLarge {
                length: 9,
                max_length: 7
            }
            .kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(Error::NotInvertible.kind(), ErrorKind::Uncorrectable);
        assert_eq!(
            Error::BufferTooSmall {
                needed: 2,
                available: 1
            }
            .kind(),
            ErrorKind::BufferTooSmall
        );
        assert_eq!(
            Error::NotSupported("x".to_string()).kind(),
            ErrorKind::NotSupported
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotPrimitive {
            degree: 4,
            modulus: 0x1f,
        };
        assert_eq!(err.to_string(), "modulus 0x1f is not primitive for GF(2^4)");
    }
}
