//! Use-rights: indivisible rights that are spent to obtain a use object.
//!
//! Each payment or purse of a use-rights mint holds at most one item. Its
//! extension exposes `unwrap()`, which consumes the right and hands back a
//! one-shot use object built by the configuration's [`UseObjectMaker`].
//! The use object carries no transferable value; the right itself is gone.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use rights_kernel::{
    Configuration, Payment, PaymentCore, Purse, PurseCore, WeakPayment, WeakPurse,
};
use rights_kernel_core::{ItemPolicy, UniExtentOps, UnitOps};
use rights_kernel_keeper::BasicMintKeeper;

use crate::error::{ConfigError, Result};

/// Builds the use object granted when an item is unwrapped.
pub trait UseObjectMaker<T>: Send + Sync + 'static {
    type UseObj;

    fn make_use_obj(&self, item: T) -> Self::UseObj;
}

impl<T, U, F> UseObjectMaker<T> for F
where
    F: Fn(T) -> U + Send + Sync + 'static,
{
    type UseObj = U;

    fn make_use_obj(&self, item: T) -> U {
        self(item)
    }
}

/// Uni-strategy configuration whose payments and purses can be unwrapped.
pub struct UseRightsConfig<T, P, M> {
    policy: P,
    maker: Arc<M>,
    _item: PhantomData<fn() -> T>,
}

impl<T, P, M> UseRightsConfig<T, P, M> {
    pub fn new(policy: P, maker: M) -> Self {
        Self {
            policy,
            maker: Arc::new(maker),
            _item: PhantomData,
        }
    }
}

impl<T, P: fmt::Debug, M> fmt::Debug for UseRightsConfig<T, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseRightsConfig")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, P, M> Configuration for UseRightsConfig<T, P, M>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
    M: UseObjectMaker<T>,
{
    type Ops = UniExtentOps<T, P>;
    type Keeper = BasicMintKeeper<UniExtentOps<T, P>>;
    type PaymentTrait = UseRightsPayment<T, P, M>;
    type PurseTrait = UseRightsPurse<T, P, M>;
    type MintTrait = ();
    type AssayTrait = ();

    fn extent_ops(&self) -> UniExtentOps<T, P> {
        UniExtentOps::new(self.policy.clone())
    }

    fn make_mint_keeper(&self, unit_ops: &UnitOps<Self::Ops>) -> Self::Keeper {
        BasicMintKeeper::new(unit_ops)
    }

    fn make_payment_trait(&self, _core: &PaymentCore<Self>) -> Self::PaymentTrait {
        UseRightsPayment {
            maker: Arc::clone(&self.maker),
            this: OnceLock::new(),
        }
    }

    fn make_purse_trait(&self, _core: &PurseCore<Self>) -> Self::PurseTrait {
        UseRightsPurse {
            this: OnceLock::new(),
        }
    }

    fn make_mint_trait(&self, _unit_ops: &UnitOps<Self::Ops>) {}

    fn make_assay_trait(&self, _unit_ops: &UnitOps<Self::Ops>) {}

    fn bind_payment_trait(&self, ext: &Self::PaymentTrait, payment: &Payment<Self>) {
        if ext.this.set(payment.downgrade()).is_err() {
            warn!(payment = %payment.id(), "use-rights payment extension already bound");
        }
    }

    fn bind_purse_trait(&self, ext: &Self::PurseTrait, purse: &Purse<Self>) {
        if ext.this.set(purse.downgrade()).is_err() {
            warn!(purse = %purse.id(), "use-rights purse extension already bound");
        }
    }
}

/// Payment extension: `unwrap()`.
pub struct UseRightsPayment<T, P, M>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
    M: UseObjectMaker<T>,
{
    maker: Arc<M>,
    this: OnceLock<WeakPayment<UseRightsConfig<T, P, M>>>,
}

impl<T, P, M> UseRightsPayment<T, P, M>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
    M: UseObjectMaker<T>,
{
    /// Burn the payment and return the use object for its item.
    pub fn unwrap(&self) -> Result<M::UseObj> {
        let payment = self
            .this
            .get()
            .ok_or(ConfigError::Unbound("payment"))?
            .upgrade()
            .ok_or(ConfigError::Released("payment"))?;

        let balance = payment.balance()?;
        let item = balance.extent().clone().ok_or(ConfigError::EmptyRight)?;
        payment.assay().burn_exactly(&balance, &payment)?;

        debug!(payment = %payment.id(), label = %payment.label(), "use right unwrapped");
        Ok(self.maker.make_use_obj(item))
    }
}

/// Purse extension: `unwrap()` spends whatever the purse holds.
pub struct UseRightsPurse<T, P, M>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
    M: UseObjectMaker<T>,
{
    this: OnceLock<WeakPurse<UseRightsConfig<T, P, M>>>,
}

impl<T, P, M> UseRightsPurse<T, P, M>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
    M: UseObjectMaker<T>,
{
    pub fn unwrap(&self) -> Result<M::UseObj> {
        let purse = self
            .this
            .get()
            .ok_or(ConfigError::Unbound("purse"))?
            .upgrade()
            .ok_or(ConfigError::Released("purse"))?;

        if purse.balance()?.extent().is_none() {
            return Err(ConfigError::EmptyRight);
        }
        let payment = purse.withdraw_all(None)?;
        payment.ext().unwrap()
    }
}
