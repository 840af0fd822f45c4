//! Purses: long-lived, refillable holders.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};

use rights_kernel_core::{Label, Units};
use rights_kernel_keeper::{Holder, PurseId};

use crate::assay::Assay;
use crate::config::Configuration;
use crate::error::Result;
use crate::mint::MintShared;
use crate::payment::Payment;

/// The kernel half of a purse, handed to the configuration when the purse's
/// extension is built.
pub struct PurseCore<C: Configuration> {
    shared: Arc<MintShared<C>>,
    id: PurseId,
    name: String,
}

impl<C: Configuration> PurseCore<C> {
    pub fn id(&self) -> PurseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &Label {
        self.shared.label()
    }

    /// Current units, read from the ledger.
    pub fn balance(&self) -> Result<Units<C::Ops>> {
        self.shared.read(|ledger| ledger.balance(Holder::Purse(self.id)))
    }

    pub fn assay(&self) -> Assay<C> {
        Assay::from_shared(Arc::clone(&self.shared))
    }
}

impl<C: Configuration> Clone for PurseCore<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            id: self.id,
            name: self.name.clone(),
        }
    }
}

struct PurseInner<C: Configuration> {
    core: PurseCore<C>,
    ext: C::PurseTrait,
}

/// A purse handle. Clones refer to the same purse.
///
/// The balance is not stored here: the mint's ledger holds it, which is
/// what lets revocation reach into a purse without the holder's help.
pub struct Purse<C: Configuration> {
    inner: Arc<PurseInner<C>>,
}

impl<C: Configuration> Purse<C> {
    pub(crate) fn build(shared: Arc<MintShared<C>>, id: PurseId, name: String) -> Self {
        let core = PurseCore { shared, id, name };
        let ext = core.shared.config.make_purse_trait(&core);
        let purse = Self {
            inner: Arc::new(PurseInner { core, ext }),
        };
        let shared = &purse.inner.core.shared;
        shared.config.bind_purse_trait(&purse.inner.ext, &purse);
        purse
    }

    fn shared(&self) -> &Arc<MintShared<C>> {
        &self.inner.core.shared
    }

    pub fn id(&self) -> PurseId {
        self.inner.core.id
    }

    pub fn name(&self) -> &str {
        self.inner.core.name()
    }

    pub fn label(&self) -> &Label {
        self.inner.core.label()
    }

    pub fn balance(&self) -> Result<Units<C::Ops>> {
        self.inner.core.balance()
    }

    pub fn assay(&self) -> Assay<C> {
        self.inner.core.assay()
    }

    pub fn core(&self) -> &PurseCore<C> {
        &self.inner.core
    }

    /// Configuration-supplied extension methods.
    pub fn ext(&self) -> &C::PurseTrait {
        &self.inner.ext
    }

    pub fn downgrade(&self) -> WeakPurse<C> {
        WeakPurse {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Deposit
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume `payment` into this purse, if it holds exactly `units`.
    pub fn deposit_exactly(&self, units: &Units<C::Ops>, payment: &Payment<C>) -> Result<Units<C::Ops>> {
        self.deposit(Some(units), payment)
    }

    /// Consume `payment` into this purse. Returns the deposited units.
    pub fn deposit_all(&self, payment: &Payment<C>) -> Result<Units<C::Ops>> {
        self.deposit(None, payment)
    }

    /// Deposit a payment that is still on its way.
    ///
    /// Nothing is read from the ledger until `payment` resolves. If it
    /// resolves to an error, the deposit fails and the purse is unchanged.
    pub async fn deposit_all_eventual<F>(&self, payment: F) -> Result<Units<C::Ops>>
    where
        F: Future<Output = Result<Payment<C>>>,
    {
        let payment = payment.await?;
        self.deposit_all(&payment)
    }

    pub async fn deposit_exactly_eventual<F>(&self, units: &Units<C::Ops>, payment: F) -> Result<Units<C::Ops>>
    where
        F: Future<Output = Result<Payment<C>>>,
    {
        let payment = payment.await?;
        self.deposit_exactly(units, &payment)
    }

    fn deposit(&self, expected: Option<&Units<C::Ops>>, payment: &Payment<C>) -> Result<Units<C::Ops>> {
        let shared = self.shared();
        shared.insist_own(payment.shared(), &payment.id())?;
        shared.write(|ledger| {
            let (plan, deposited) =
                ledger.plan_deposit(&shared.unit_ops, self.id(), payment.id(), expected)?;
            ledger.commit(plan)?;
            Ok(deposited)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Withdraw
    // ─────────────────────────────────────────────────────────────────────────

    /// Move `units` out into a new payment.
    pub fn withdraw(&self, units: &Units<C::Ops>, name: Option<&str>) -> Result<Payment<C>> {
        self.withdraw_units(Some(units), name)
    }

    /// Move the whole balance out into a new payment.
    pub fn withdraw_all(&self, name: Option<&str>) -> Result<Payment<C>> {
        self.withdraw_units(None, name)
    }

    fn withdraw_units(&self, units: Option<&Units<C::Ops>>, name: Option<&str>) -> Result<Payment<C>> {
        let shared = self.shared();
        let id = shared.write(|ledger| {
            let (plan, id, _) = ledger.plan_withdraw(&shared.unit_ops, self.id(), units)?;
            ledger.commit(plan)?;
            Ok(id)
        })?;
        let name = shared.name_or(name, &shared.options.withdrawal_name);
        Ok(Payment::build(Arc::clone(shared), id, name))
    }
}

impl<C: Configuration> Clone for Purse<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Configuration> fmt::Debug for Purse<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Purse")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("label", self.label())
            .finish()
    }
}

/// A purse reference for extensions; does not keep the purse alive.
pub struct WeakPurse<C: Configuration> {
    inner: Weak<PurseInner<C>>,
}

impl<C: Configuration> WeakPurse<C> {
    pub fn upgrade(&self) -> Option<Purse<C>> {
        self.inner.upgrade().map(|inner| Purse { inner })
    }
}

impl<C: Configuration> Clone for WeakPurse<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BasicConfig;
    use crate::error::KernelError;
    use crate::mint::Mint;
    use rights_kernel_core::CoreError;

    #[test]
    fn test_withdraw_then_deposit() {
        let mint = Mint::new(BasicConfig, "moola");
        let assay = mint.assay();
        let alice = mint.mint(1000, Some("alice")).unwrap();
        let bob = assay.make_empty_purse(Some("bob")).unwrap();

        let payment = alice.withdraw(&assay.make_units(7).unwrap(), None).unwrap();
        assert_eq!(payment.name(), "a withdrawal payment");
        assert_eq!(*alice.balance().unwrap().extent(), 993);

        let deposited = bob.deposit_all(&payment).unwrap();
        assert_eq!(*deposited.extent(), 7);
        assert_eq!(*bob.balance().unwrap().extent(), 7);
        assert!(bob.deposit_all(&payment).unwrap_err().is_stale_handle());
    }

    #[test]
    fn test_overdraw_changes_nothing() {
        let mint = Mint::new(BasicConfig, "moola");
        let purse = mint.mint(5, None).unwrap();
        let err = purse
            .withdraw(&mint.assay().make_units(6).unwrap(), None)
            .unwrap_err();
        assert!(matches!(err, KernelError::Core(CoreError::NotIncluded { .. })));
        assert_eq!(*purse.balance().unwrap().extent(), 5);
        assert_eq!(mint.live_counts().unwrap(), (1, 0));
    }

    #[test]
    fn test_deposit_exactly_mismatch_keeps_payment() {
        let mint = Mint::new(BasicConfig, "moola");
        let assay = mint.assay();
        let purse = mint.mint(10, None).unwrap();
        let payment = purse.withdraw(&assay.make_units(4).unwrap(), None).unwrap();

        let err = purse
            .deposit_exactly(&assay.make_units(5).unwrap(), &payment)
            .unwrap_err();
        assert!(matches!(err, KernelError::BalanceMismatch { .. }));
        assert_eq!(*payment.balance().unwrap().extent(), 4);

        purse
            .deposit_exactly(&assay.make_units(4).unwrap(), &payment)
            .unwrap();
        assert_eq!(*purse.balance().unwrap().extent(), 10);
    }

    #[test]
    fn test_deposit_overflow_rejected() {
        let mint = Mint::new(BasicConfig, "moola");
        let full = mint.mint(u64::MAX, None).unwrap();
        let extra = mint.mint(1, None).unwrap().withdraw_all(None).unwrap();
        let err = full.deposit_all(&extra).unwrap_err();
        assert!(matches!(err, KernelError::Core(CoreError::Overflow { .. })));
        assert_eq!(*extra.balance().unwrap().extent(), 1);
    }
}
