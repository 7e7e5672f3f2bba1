//! Error types for trapdoor and set operations
//!
//! All errors are structural: they are detected before any state is touched
//! and surface directly to the caller. Probabilistic outcomes (hash
//! collisions, Bloom false positives) are never errors; they are reported in
//! the `fpr`/`fnr` fields of the returned [`Approx`](crate::approx::Approx).

use thiserror::Error;

/// Errors that can occur during trapdoor and set operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Operands were produced under different secret keys
    #[error("incompatible key fingerprints: {left:#018x} vs {right:#018x}")]
    IncompatibleKey { left: u64, right: u64 },

    /// Batch operation over slices of unequal length
    #[error("batch size mismatch: {left} vs {right}")]
    SizeMismatch { left: usize, right: usize },

    /// Threshold scheme with `required = 0` or `required > total`
    #[error("invalid threshold: {required}-of-{total}")]
    InvalidThreshold { required: usize, total: usize },

    /// Too few shares to reconstruct
    #[error("insufficient shares: need {required}, got {provided}")]
    InsufficientShares { required: usize, provided: usize },

    /// Multiplicative combination of zero components
    #[error("compound trapdoor has no components")]
    EmptyCompound,

    /// Serialized buffer shorter than the fixed wire size
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    TruncatedInput { expected: usize, actual: usize },
}

impl Error {
    /// Build an [`Error::IncompatibleKey`] from two fingerprints.
    pub(crate) fn incompatible(left: u64, right: u64) -> Self {
        Error::IncompatibleKey { left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_fingerprints() {
        let err = Error::IncompatibleKey {
            left: 0x1,
            right: 0x2,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x"), "fingerprints should render as hex");
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(Error::EmptyCompound, Error::EmptyCompound);
        assert_ne!(
            Error::SizeMismatch { left: 1, right: 2 },
            Error::EmptyCompound
        );
    }
}
