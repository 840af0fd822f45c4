//! Error types for the Rights Kernel Core.

use thiserror::Error;

use crate::types::MintId;

/// Errors raised by the amount algebra.
///
/// Every variant is a validation failure: it is detected before any ledger
/// state is touched, so the caller's assets are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("label mismatch: expected units of {expected}, got units of {actual}")]
    LabelMismatch { expected: MintId, actual: MintId },

    #[error("invalid extent for {strategy}: {reason}")]
    InvalidExtent {
        strategy: &'static str,
        reason: String,
    },

    #[error("{strategy} extent is not included in the whole")]
    NotIncluded { strategy: &'static str },

    #[error("{strategy} union is not representable: overflow")]
    Overflow { strategy: &'static str },

    #[error("{strategy} extents are indivisible and cannot be combined")]
    Indivisible { strategy: &'static str },
}

impl CoreError {
    /// Shorthand for an `InvalidExtent` error.
    pub fn invalid(strategy: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidExtent {
            strategy,
            reason: reason.into(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
