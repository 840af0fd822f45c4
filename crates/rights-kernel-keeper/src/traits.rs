//! MintKeeper trait: the abstract interface for a mint's ledger.
//!
//! The kernel never touches a ledger map directly. Every balance read and
//! write goes through these methods, which lets a keeper maintain extra
//! indexes (see [`RevocableKeeper`]) without any caller cooperating.

use rights_kernel_core::{ElementwiseOps, ExtentOps, Units};

use crate::error::Result;
use crate::types::Holder;

/// The ledger of one mint: live handle -> current units.
///
/// # Invariants
///
/// - Every live purse and payment has exactly one entry.
/// - A removed handle never regains an entry; ids are not reused by the
///   kernel, so `record_new` on a removed id only happens on a bug and is
///   rejected if the entry is still present.
pub trait MintKeeper<O: ExtentOps>: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Entry Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create the entry for a new handle.
    ///
    /// Fails with `AlreadyRecorded` if the handle has an entry.
    fn record_new(&mut self, holder: Holder, units: Units<O>) -> Result<()>;

    /// Replace the units of a live handle.
    ///
    /// Fails with `NotFound` if the handle has no entry.
    fn update_units(&mut self, holder: Holder, units: Units<O>) -> Result<()>;

    /// Current units of a live handle.
    ///
    /// This is where exactly-once is enforced: once removed, every lookup
    /// fails with `NotFound`.
    fn get_units(&self, holder: Holder) -> Result<&Units<O>>;

    fn has(&self, holder: Holder) -> bool;

    /// Check that `units` may be issued as new value.
    ///
    /// Plain ledgers accept anything. Keepers that track individual
    /// elements reject an element that a live handle already holds.
    fn insist_fresh(&self, _units: &Units<O>) -> Result<()> {
        Ok(())
    }

    /// Delete the entry and hand back its final units.
    fn remove(&mut self, holder: Holder) -> Result<Units<O>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Audit Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// All live handles, purses first, each group in id order.
    fn holders(&self) -> Vec<Holder>;

    fn purse_count(&self) -> usize {
        self.holders().iter().filter(|h| !h.is_payment()).count()
    }

    fn payment_count(&self) -> usize {
        self.holders().iter().filter(|h| h.is_payment()).count()
    }
}

/// A keeper that can take specific elements away from whoever holds them.
pub trait RevocableKeeper<O: ElementwiseOps>: MintKeeper<O> {
    /// The handle currently holding `element`, if any.
    fn holder_of(&self, element: &O::Element) -> Result<Option<Holder>>;

    /// Remove every element of `target` from wherever it resides.
    ///
    /// Elements nobody holds are skipped. All new balances are computed
    /// before any entry changes. Returns the units actually destroyed.
    fn destroy(&mut self, target: &Units<O>) -> Result<Units<O>>;
}
