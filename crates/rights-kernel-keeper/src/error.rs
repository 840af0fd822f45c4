//! Error types for the keeper module.

use rights_kernel_core::CoreError;
use thiserror::Error;

use crate::types::Holder;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeeperError {
    /// A live entry already exists for this handle.
    #[error("key already recorded: {0}")]
    AlreadyRecorded(Holder),

    /// No entry for this handle: it was consumed, or never issued here.
    #[error("key not found: {0}")]
    NotFound(Holder),

    /// Newly issued units contain an element some live handle already holds.
    #[error("element already held by {0}")]
    ElementHeld(Holder),

    /// An extent element could not be turned into an index key.
    #[error("element encoding error: {0}")]
    Encoding(String),

    /// The per-element index disagrees with the ledger.
    #[error("revocation index out of sync: {0}")]
    IndexOutOfSync(String),

    /// Amount algebra error.
    #[error("units error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for keeper operations.
pub type Result<T> = std::result::Result<T, KeeperError>;
