//! The Assay: the public, issuer-side facet of a mint.
//!
//! Anyone holding an assay can check amounts and reshape payments, but
//! cannot create value. Every reshaping operation conserves the total.

use std::fmt;
use std::sync::{Arc, Weak};

use rights_kernel_core::{ExtentOps, Label, UnitOps, Units, UnitsDescriptor};
use rights_kernel_keeper::{Holder, MintKeeper, PaymentId};

use crate::config::Configuration;
use crate::error::{KernelError, Result};
use crate::mint::MintShared;
use crate::payment::Payment;
use crate::purse::Purse;

pub struct Assay<C: Configuration> {
    shared: Arc<MintShared<C>>,
}

impl<C: Configuration> Assay<C> {
    pub(crate) fn from_shared(shared: Arc<MintShared<C>>) -> Self {
        Self { shared }
    }

    pub fn label(&self) -> &Label {
        self.shared.label()
    }

    pub fn unit_ops(&self) -> &UnitOps<C::Ops> {
        &self.shared.unit_ops
    }

    /// Name of the selected extent strategy.
    pub fn extent_ops_name(&self) -> &'static str {
        self.shared.unit_ops.extent_ops_name()
    }

    pub fn ext(&self) -> &C::AssayTrait {
        &self.shared.assay_ext
    }

    pub fn make_units(&self, extent: <C::Ops as ExtentOps>::Extent) -> Result<Units<C::Ops>> {
        Ok(self.shared.unit_ops.make(extent)?)
    }

    /// Accept units of this mint; fails on any other label.
    pub fn coerce(&self, units: &Units<C::Ops>) -> Result<Units<C::Ops>> {
        Ok(self.shared.unit_ops.coerce(units)?)
    }

    /// Re-validate an amount that travelled as plain data.
    pub fn coerce_descriptor(
        &self,
        descriptor: UnitsDescriptor<<C::Ops as ExtentOps>::Extent>,
    ) -> Result<Units<C::Ops>> {
        Ok(self.shared.unit_ops.coerce_descriptor(descriptor)?)
    }

    pub fn make_empty_purse(&self, name: Option<&str>) -> Result<Purse<C>> {
        MintShared::new_purse(&self.shared, &self.shared.unit_ops.empty(), name)
    }

    /// Does `payment` still have a ledger entry?
    pub fn is_live(&self, payment: &Payment<C>) -> Result<bool> {
        let id = self.own_payment(payment)?;
        self.shared
            .read(|ledger| Ok(ledger.keeper().has(Holder::Payment(id))))
    }

    pub fn same_mint(&self, other: &Assay<C>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn downgrade(&self) -> WeakAssay<C> {
        WeakAssay {
            shared: Arc::downgrade(&self.shared),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payment Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge payments into one new payment holding their union.
    pub fn combine(&self, payments: &[Payment<C>], name: Option<&str>) -> Result<Payment<C>> {
        self.insist_batch(payments.len())?;
        let ids = payments
            .iter()
            .map(|p| self.own_payment(p))
            .collect::<Result<Vec<_>>>()?;
        let id = self.shared.write(|ledger| {
            let (plan, id, _) = ledger.plan_combine(&self.shared.unit_ops, &ids)?;
            ledger.commit(plan)?;
            Ok(id)
        })?;
        Ok(self.payment(id, name, &self.shared.options.combined_name))
    }

    /// Split one payment into payments of exactly `amounts`.
    ///
    /// The amounts must cover the payment exactly. Without `names`, every
    /// output gets the default split name.
    pub fn split(
        &self,
        payment: &Payment<C>,
        amounts: &[Units<C::Ops>],
        names: Option<&[&str]>,
    ) -> Result<Vec<Payment<C>>> {
        if let Some(names) = names {
            if names.len() != amounts.len() {
                return Err(KernelError::NamesLengthMismatch {
                    amounts: amounts.len(),
                    names: names.len(),
                });
            }
        }
        self.insist_batch(amounts.len())?;
        let source = self.own_payment(payment)?;
        let outputs = self.shared.write(|ledger| {
            let (plan, outputs) = ledger.plan_split(&self.shared.unit_ops, source, amounts)?;
            ledger.commit(plan)?;
            Ok(outputs)
        })?;
        Ok(outputs
            .into_iter()
            .enumerate()
            .map(|(i, (id, _))| {
                let name = names.map(|names| names[i]);
                self.payment(id, name, &self.shared.options.split_name)
            })
            .collect())
    }

    /// Move a payment's units into a fresh payment, if they equal `units`.
    pub fn claim_exactly(
        &self,
        units: &Units<C::Ops>,
        payment: &Payment<C>,
        name: Option<&str>,
    ) -> Result<Payment<C>> {
        self.claim(Some(units), payment, name)
    }

    /// Move a payment's whole balance into a fresh payment.
    pub fn claim_all(&self, payment: &Payment<C>, name: Option<&str>) -> Result<Payment<C>> {
        self.claim(None, payment, name)
    }

    /// Destroy a payment holding exactly `units`.
    pub fn burn_exactly(&self, units: &Units<C::Ops>, payment: &Payment<C>) -> Result<Units<C::Ops>> {
        self.burn(Some(units), payment)
    }

    /// Destroy a payment, returning what it held.
    pub fn burn_all(&self, payment: &Payment<C>) -> Result<Units<C::Ops>> {
        self.burn(None, payment)
    }

    fn claim(
        &self,
        expected: Option<&Units<C::Ops>>,
        payment: &Payment<C>,
        name: Option<&str>,
    ) -> Result<Payment<C>> {
        let source = self.own_payment(payment)?;
        let id = self.shared.write(|ledger| {
            let (plan, id, _) = ledger.plan_claim(&self.shared.unit_ops, source, expected)?;
            ledger.commit(plan)?;
            Ok(id)
        })?;
        Ok(self.payment(id, name, &self.shared.options.claimed_name))
    }

    fn burn(&self, expected: Option<&Units<C::Ops>>, payment: &Payment<C>) -> Result<Units<C::Ops>> {
        let source = self.own_payment(payment)?;
        self.shared.write(|ledger| {
            let (plan, burned) = ledger.plan_burn(&self.shared.unit_ops, source, expected)?;
            ledger.commit(plan)?;
            Ok(burned)
        })
    }

    fn own_payment(&self, payment: &Payment<C>) -> Result<PaymentId> {
        self.shared.insist_own(payment.shared(), &payment.id())?;
        Ok(payment.id())
    }

    fn insist_batch(&self, size: usize) -> Result<()> {
        let max = self.shared.options.max_batch;
        if size > max {
            return Err(KernelError::BatchTooLarge { size, max });
        }
        Ok(())
    }

    fn payment(&self, id: PaymentId, name: Option<&str>, default: &str) -> Payment<C> {
        Payment::build(Arc::clone(&self.shared), id, self.shared.name_or(name, default))
    }
}

impl<C: Configuration> Clone for Assay<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: Configuration> fmt::Debug for Assay<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assay").field("label", self.label()).finish()
    }
}

/// An assay reference that does not keep the mint alive.
pub struct WeakAssay<C: Configuration> {
    shared: Weak<MintShared<C>>,
}

impl<C: Configuration> WeakAssay<C> {
    pub fn upgrade(&self) -> Option<Assay<C>> {
        self.shared.upgrade().map(Assay::from_shared)
    }
}

impl<C: Configuration> Clone for WeakAssay<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}
