//! Payments: single-use holders for rights in transit.
//!
//! A payment carries no balance of its own. Its units live in the mint's
//! ledger under its id, and every consuming operation removes that entry,
//! so a used payment fails every later call with a stale-handle error.

use std::fmt;
use std::sync::{Arc, Weak};

use rights_kernel_core::{Label, Units};
use rights_kernel_keeper::{Holder, PaymentId};

use crate::assay::Assay;
use crate::config::Configuration;
use crate::error::Result;
use crate::mint::MintShared;

/// The kernel half of a payment, handed to the configuration when the
/// payment's extension is built.
pub struct PaymentCore<C: Configuration> {
    shared: Arc<MintShared<C>>,
    id: PaymentId,
    name: String,
}

impl<C: Configuration> PaymentCore<C> {
    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &Label {
        self.shared.label()
    }

    /// Current units. Fails once the payment has been consumed.
    pub fn balance(&self) -> Result<Units<C::Ops>> {
        self.shared.read(|ledger| ledger.balance(Holder::Payment(self.id)))
    }

    pub fn assay(&self) -> Assay<C> {
        Assay::from_shared(Arc::clone(&self.shared))
    }
}

impl<C: Configuration> Clone for PaymentCore<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            id: self.id,
            name: self.name.clone(),
        }
    }
}

struct PaymentInner<C: Configuration> {
    core: PaymentCore<C>,
    ext: C::PaymentTrait,
}

/// A payment handle. Clones refer to the same payment.
pub struct Payment<C: Configuration> {
    inner: Arc<PaymentInner<C>>,
}

impl<C: Configuration> Payment<C> {
    pub(crate) fn build(shared: Arc<MintShared<C>>, id: PaymentId, name: String) -> Self {
        let core = PaymentCore { shared, id, name };
        let ext = core.shared.config.make_payment_trait(&core);
        let payment = Self {
            inner: Arc::new(PaymentInner { core, ext }),
        };
        let shared = &payment.inner.core.shared;
        shared.config.bind_payment_trait(&payment.inner.ext, &payment);
        payment
    }

    pub(crate) fn shared(&self) -> &Arc<MintShared<C>> {
        &self.inner.core.shared
    }

    pub fn id(&self) -> PaymentId {
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

    pub fn core(&self) -> &PaymentCore<C> {
        &self.inner.core
    }

    /// Configuration-supplied extension methods.
    pub fn ext(&self) -> &C::PaymentTrait {
        &self.inner.ext
    }

    pub fn downgrade(&self) -> WeakPayment<C> {
        WeakPayment {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<C: Configuration> Clone for Payment<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Configuration> fmt::Debug for Payment<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payment")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("label", self.label())
            .finish()
    }
}

/// A payment reference for extensions; does not keep the payment alive.
pub struct WeakPayment<C: Configuration> {
    inner: Weak<PaymentInner<C>>,
}

impl<C: Configuration> WeakPayment<C> {
    pub fn upgrade(&self) -> Option<Payment<C>> {
        self.inner.upgrade().map(|inner| Payment { inner })
    }
}

impl<C: Configuration> Clone for WeakPayment<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BasicConfig;
    use crate::mint::Mint;

    #[test]
    fn test_balance_fails_after_consumption() {
        let mint = Mint::new(BasicConfig, "moola");
        let purse = mint.mint(10, None).unwrap();
        let payment = purse.withdraw_all(Some("all of it")).unwrap();
        assert_eq!(payment.name(), "all of it");
        assert_eq!(*payment.balance().unwrap().extent(), 10);

        let clone = payment.clone();
        purse.deposit_all(&payment).unwrap();
        assert!(clone.balance().unwrap_err().is_stale_handle());
        assert!(payment.core().balance().unwrap_err().is_stale_handle());
    }

    #[test]
    fn test_weak_payment_upgrade() {
        let mint = Mint::new(BasicConfig, "moola");
        let payment = mint.mint(1, None).unwrap().withdraw_all(None).unwrap();
        let weak = payment.downgrade();
        assert_eq!(weak.upgrade().unwrap().id(), payment.id());
        drop(payment);
        assert!(weak.upgrade().is_none());
    }
}
