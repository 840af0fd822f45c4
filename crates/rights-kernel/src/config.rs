//! Mint configuration: the strategy bundle plus ambient options.
//!
//! A [`Configuration`] fixes, at compile time, everything that varies
//! between kinds of rights: the extent algebra, the ledger implementation
//! and one extension object per role. A type that leaves out any of these
//! does not implement the trait, so an incomplete configuration is rejected
//! by the compiler rather than on first use.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use rights_kernel_core::{ExtentOps, ListExtentOps, NatExtentOps, UnitOps};
use rights_kernel_keeper::{BasicMintKeeper, MintKeeper, RevocableMintKeeper};

use crate::assay::Assay;
use crate::mint::Mint;
use crate::payment::{Payment, PaymentCore};
use crate::purse::{Purse, PurseCore};

/// The six members every mint configuration supplies.
///
/// Extensions are built in two phases. `make_*_trait` runs first and gets
/// the role's core (for purses and payments, a handle with the core
/// methods; for mints and assays, the unit ops). `bind_*_trait` runs once
/// the finished role object exists, so an extension can keep a weak handle
/// to it. Extensions must hold only weak handles to their own mint, or the
/// mint is never dropped.
pub trait Configuration: Send + Sync + Sized + 'static {
    /// Extent algebra.
    type Ops: ExtentOps;
    /// Ledger implementation.
    type Keeper: MintKeeper<Self::Ops>;
    type PaymentTrait: Send + Sync + 'static;
    type PurseTrait: Send + Sync + 'static;
    type MintTrait: Send + Sync + 'static;
    type AssayTrait: Send + Sync + 'static;

    // ─────────────────────────────────────────────────────────────────────────
    // Required
    // ─────────────────────────────────────────────────────────────────────────

    /// Strategy selector: the algebra instance, with its arguments applied.
    fn extent_ops(&self) -> Self::Ops;

    fn make_mint_keeper(&self, unit_ops: &UnitOps<Self::Ops>) -> Self::Keeper;

    fn make_payment_trait(&self, core: &PaymentCore<Self>) -> Self::PaymentTrait;

    fn make_purse_trait(&self, core: &PurseCore<Self>) -> Self::PurseTrait;

    fn make_mint_trait(&self, unit_ops: &UnitOps<Self::Ops>) -> Self::MintTrait;

    fn make_assay_trait(&self, unit_ops: &UnitOps<Self::Ops>) -> Self::AssayTrait;

    // ─────────────────────────────────────────────────────────────────────────
    // Late binding
    // ─────────────────────────────────────────────────────────────────────────

    fn bind_payment_trait(&self, _ext: &Self::PaymentTrait, _payment: &Payment<Self>) {}

    fn bind_purse_trait(&self, _ext: &Self::PurseTrait, _purse: &Purse<Self>) {}

    fn bind_mint_trait(&self, _ext: &Self::MintTrait, _mint: &Mint<Self>) {}

    fn bind_assay_trait(&self, _ext: &Self::AssayTrait, _assay: &Assay<Self>) {}
}

/// Plain fungible quantities: natural numbers, no extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConfig;

impl Configuration for BasicConfig {
    type Ops = NatExtentOps;
    type Keeper = BasicMintKeeper<NatExtentOps>;
    type PaymentTrait = ();
    type PurseTrait = ();
    type MintTrait = ();
    type AssayTrait = ();

    fn extent_ops(&self) -> NatExtentOps {
        NatExtentOps
    }

    fn make_mint_keeper(&self, unit_ops: &UnitOps<NatExtentOps>) -> Self::Keeper {
        BasicMintKeeper::new(unit_ops)
    }

    fn make_payment_trait(&self, _core: &PaymentCore<Self>) {}

    fn make_purse_trait(&self, _core: &PurseCore<Self>) {}

    fn make_mint_trait(&self, _unit_ops: &UnitOps<NatExtentOps>) {}

    fn make_assay_trait(&self, _unit_ops: &UnitOps<NatExtentOps>) {}
}

/// Sets of unique items with an issuer-side revocation index.
pub struct ItemSetConfig<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> ItemSetConfig<T> {
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T> Default for ItemSetConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ItemSetConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemSetConfig")
    }
}

impl<T> Configuration for ItemSetConfig<T>
where
    T: Clone + fmt::Debug + Ord + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    type Ops = ListExtentOps<T>;
    type Keeper = RevocableMintKeeper<ListExtentOps<T>>;
    type PaymentTrait = ();
    type PurseTrait = ();
    type MintTrait = ();
    type AssayTrait = ();

    fn extent_ops(&self) -> ListExtentOps<T> {
        ListExtentOps::default()
    }

    fn make_mint_keeper(&self, unit_ops: &UnitOps<ListExtentOps<T>>) -> Self::Keeper {
        RevocableMintKeeper::new(unit_ops)
    }

    fn make_payment_trait(&self, _core: &PaymentCore<Self>) {}

    fn make_purse_trait(&self, _core: &PurseCore<Self>) {}

    fn make_mint_trait(&self, _unit_ops: &UnitOps<ListExtentOps<T>>) {}

    fn make_assay_trait(&self, _unit_ops: &UnitOps<ListExtentOps<T>>) {}
}

/// Per-mint options that are not part of the strategy.
#[derive(Debug, Clone)]
pub struct MintOptions {
    /// Most outputs of one `split` or inputs of one `combine`.
    pub max_batch: usize,
    pub purse_name: String,
    pub withdrawal_name: String,
    pub split_name: String,
    pub combined_name: String,
    pub claimed_name: String,
}

impl Default for MintOptions {
    fn default() -> Self {
        Self {
            max_batch: 1024,
            purse_name: "a purse".to_string(),
            withdrawal_name: "a withdrawal payment".to_string(),
            split_name: "a split payment".to_string(),
            combined_name: "a combined payment".to_string(),
            claimed_name: "a claimed payment".to_string(),
        }
    }
}
