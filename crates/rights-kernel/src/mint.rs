//! The Mint: issuing authority and owner of one ledger.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use tracing::debug;

use rights_kernel_core::{ElementwiseOps, ExtentOps, Label, UnitOps, Units};
use rights_kernel_keeper::{Holder, MintKeeper, RevocableKeeper};

use crate::assay::Assay;
use crate::commit::Ledger;
use crate::config::{Configuration, MintOptions};
use crate::error::{KernelError, Result};
use crate::purse::Purse;

pub(crate) type MintLedger<C> =
    Ledger<<C as Configuration>::Ops, <C as Configuration>::Keeper>;

/// State shared by every role object of one mint.
pub(crate) struct MintShared<C: Configuration> {
    pub(crate) config: C,
    pub(crate) unit_ops: UnitOps<C::Ops>,
    pub(crate) options: MintOptions,
    ledger: RwLock<MintLedger<C>>,
    pub(crate) mint_ext: C::MintTrait,
    pub(crate) assay_ext: C::AssayTrait,
}

impl<C: Configuration> MintShared<C> {
    pub(crate) fn label(&self) -> &Label {
        self.unit_ops.label()
    }

    /// Run `f` against a sound ledger.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&MintLedger<C>) -> Result<R>) -> Result<R> {
        let ledger = self.ledger.read().map_err(|_| self.poisoned())?;
        ledger.ensure_sound(self.label())?;
        f(&ledger)
    }

    /// Run `f` with exclusive access to a sound ledger. Nothing else touches
    /// the ledger between the first check and the last write inside `f`.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut MintLedger<C>) -> Result<R>) -> Result<R> {
        let mut ledger = self.ledger.write().map_err(|_| self.poisoned())?;
        ledger.ensure_sound(self.label())?;
        f(&mut ledger)
    }

    /// Reject a purse or payment issued by another mint.
    pub(crate) fn insist_own(&self, owner: &Arc<MintShared<C>>, handle: &dyn fmt::Display) -> Result<()> {
        if std::ptr::eq(self, Arc::as_ptr(owner)) {
            return Ok(());
        }
        Err(KernelError::ForeignAsset(format!(
            "{handle} of {}",
            owner.label()
        )))
    }

    fn poisoned(&self) -> KernelError {
        KernelError::MintSuspect(self.label().to_string())
    }

    pub(crate) fn name_or(&self, name: Option<&str>, default: &str) -> String {
        name.unwrap_or(default).to_string()
    }

    /// Record a new purse holding `units` and build its role object.
    pub(crate) fn new_purse(
        shared: &Arc<Self>,
        units: &Units<C::Ops>,
        name: Option<&str>,
    ) -> Result<Purse<C>> {
        let id = shared.write(|ledger| {
            let (plan, id) = ledger.plan_purse(&shared.unit_ops, units)?;
            ledger.commit(plan)?;
            Ok(id)
        })?;
        let name = shared.name_or(name, &shared.options.purse_name);
        Ok(Purse::build(Arc::clone(shared), id, name))
    }
}

/// The issuing authority for one kind of rights.
///
/// Only the mint can create value. Everything else the kernel does moves
/// value between purses and payments without changing the total.
pub struct Mint<C: Configuration> {
    shared: Arc<MintShared<C>>,
}

impl<C: Configuration> Mint<C> {
    /// Create a mint with default options.
    pub fn new(config: C, name: &str) -> Self {
        Self::with_options(config, name, MintOptions::default())
    }

    pub fn with_options(config: C, name: &str, options: MintOptions) -> Self {
        let label = Label::new(name);
        let unit_ops = UnitOps::new(label, config.extent_ops());
        let keeper = config.make_mint_keeper(&unit_ops);
        let mint_ext = config.make_mint_trait(&unit_ops);
        let assay_ext = config.make_assay_trait(&unit_ops);

        let mint = Self {
            shared: Arc::new(MintShared {
                config,
                unit_ops,
                options,
                ledger: RwLock::new(Ledger::new(keeper)),
                mint_ext,
                assay_ext,
            }),
        };

        let assay = mint.assay();
        mint.shared.config.bind_mint_trait(&mint.shared.mint_ext, &mint);
        mint.shared.config.bind_assay_trait(&mint.shared.assay_ext, &assay);

        debug!(
            label = %mint.label(),
            strategy = mint.shared.unit_ops.extent_ops_name(),
            "mint created"
        );
        mint
    }

    pub fn label(&self) -> &Label {
        self.shared.label()
    }

    pub fn unit_ops(&self) -> &UnitOps<C::Ops> {
        &self.shared.unit_ops
    }

    pub fn options(&self) -> &MintOptions {
        &self.shared.options
    }

    pub fn config(&self) -> &C {
        &self.shared.config
    }

    /// The public facet of this mint.
    pub fn assay(&self) -> Assay<C> {
        Assay::from_shared(Arc::clone(&self.shared))
    }

    /// Configuration-supplied extension methods.
    pub fn ext(&self) -> &C::MintTrait {
        &self.shared.mint_ext
    }

    /// Create new value: a purse holding `initial`.
    pub fn mint(&self, initial: <C::Ops as ExtentOps>::Extent, name: Option<&str>) -> Result<Purse<C>> {
        let units = self.shared.unit_ops.make(initial)?;
        let purse = MintShared::new_purse(&self.shared, &units, name)?;
        debug!(label = %self.label(), purse = %purse.id(), "minted");
        Ok(purse)
    }

    /// Sum of every live purse and payment.
    pub fn outstanding(&self) -> Result<Units<C::Ops>> {
        let unit_ops = &self.shared.unit_ops;
        self.shared.read(|ledger| {
            let keeper = ledger.keeper();
            keeper.holders().into_iter().try_fold(unit_ops.empty(), |total, holder| {
                Ok(unit_ops.with(&total, keeper.get_units(holder)?)?)
            })
        })
    }

    /// Live `(purses, payments)`.
    pub fn live_counts(&self) -> Result<(usize, usize)> {
        self.shared
            .read(|ledger| Ok((ledger.keeper().purse_count(), ledger.keeper().payment_count())))
    }

    pub fn same_mint(&self, other: &Mint<C>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn downgrade(&self) -> WeakMint<C> {
        WeakMint {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl<C> Mint<C>
where
    C: Configuration,
    C::Ops: ElementwiseOps,
    C::Keeper: RevocableKeeper<C::Ops>,
{
    /// Take every element of `target` away from whoever holds it.
    ///
    /// Elements nobody holds are ignored. Returns what was destroyed.
    pub fn destroy(&self, target: &Units<C::Ops>) -> Result<Units<C::Ops>> {
        let destroyed = self.shared.write(|ledger| ledger.destroy(target))?;
        debug!(
            label = %self.label(),
            elements = self.shared.unit_ops.ops().elements(destroyed.extent()).len(),
            "revoked"
        );
        Ok(destroyed)
    }

    /// The handle currently holding `element`.
    pub fn holder_of(&self, element: &<C::Ops as ElementwiseOps>::Element) -> Result<Option<Holder>> {
        self.shared.read(|ledger| ledger.holder_of(element))
    }
}

impl<C: Configuration> Clone for Mint<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: Configuration> fmt::Debug for Mint<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mint")
            .field("label", self.label())
            .field("strategy", &self.shared.unit_ops.extent_ops_name())
            .finish()
    }
}

/// A mint reference that does not keep the mint alive.
pub struct WeakMint<C: Configuration> {
    shared: Weak<MintShared<C>>,
}

impl<C: Configuration> WeakMint<C> {
    pub fn upgrade(&self) -> Option<Mint<C>> {
        self.shared.upgrade().map(|shared| Mint { shared })
    }
}

impl<C: Configuration> Clone for WeakMint<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}
