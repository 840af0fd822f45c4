//! Error types for the Kernel.

use rights_kernel_core::CoreError;
use rights_kernel_keeper::{KeeperError, PaymentId};
use thiserror::Error;

/// Errors that can occur during Kernel operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Amount algebra error (label mismatch, malformed extent, ...).
    #[error("units error: {0}")]
    Core(#[from] CoreError),

    /// Ledger error. `NotFound` here means a stale handle.
    #[error("ledger error: {0}")]
    Keeper(#[from] KeeperError),

    /// An "exactly" operation was given units other than the balance.
    #[error("balance must equal units: balance {balance}, units {units}")]
    BalanceMismatch { balance: String, units: String },

    /// `split` was given a names list that does not match its amounts.
    #[error("names length {names} does not match amounts length {amounts}")]
    NamesLengthMismatch { amounts: usize, names: usize },

    /// The split amounts do not add up to the source payment.
    #[error("split amounts must exactly cover the payment: {0}")]
    SplitCoverage(String),

    /// A purse or payment issued by another mint.
    #[error("asset belongs to another mint: {0}")]
    ForeignAsset(String),

    /// The same payment was listed twice in one `combine`.
    #[error("payment listed more than once: {0}")]
    DuplicatePayment(PaymentId),

    /// Too many outputs (split) or inputs (combine) in one call.
    #[error("batch of {size} exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// A ledger mutation failed after validation passed.
    #[error("commit point violated in {op}: {reason}")]
    CommitPointViolation { op: &'static str, reason: String },

    /// The mint saw a commit point violation earlier and refuses all work.
    #[error("mint {0} is suspect after an earlier commit failure")]
    MintSuspect(String),

    /// An eventual payment was never delivered.
    #[error("payment was not delivered: {0}")]
    Rejected(String),
}

impl KernelError {
    /// The handle was consumed, or never existed in this ledger.
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, KernelError::Keeper(KeeperError::NotFound(_)))
    }

    /// Failed before touching the ledger. The inputs are still usable.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            KernelError::CommitPointViolation { .. } | KernelError::MintSuspect(_)
        ) && !self.is_stale_handle()
    }
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
