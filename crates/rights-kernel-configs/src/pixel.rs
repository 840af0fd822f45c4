//! Pixels: revocable grid rights with hierarchical delegation.
//!
//! A pixel mint issues sets of canvas cells. Holding a pixel lets the
//! holder change its colour through a use object. The issuer can revoke
//! any pixel wherever it currently sits, and each mint can lazily spawn a
//! child mint for delegating pixels further; revocation in a parent
//! cascades into every descendant.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use rights_kernel::{
    Assay, Configuration, Mint, Payment, PaymentCore, Purse, PurseCore, WeakMint, WeakPayment,
    WeakPurse,
};
use rights_kernel_core::{ListExtentOps, UnitOps, Units};
use rights_kernel_keeper::RevocableMintKeeper;

use crate::canvas::{Canvas, Color, Pixel, PixelPolicy};
use crate::error::{ConfigError, Result};

pub type PixelOps = ListExtentOps<Pixel, PixelPolicy>;
pub type PixelUnits = Units<PixelOps>;

/// Configuration for one mint in a pixel hierarchy.
pub struct PixelConfig {
    canvas: Arc<Canvas>,
    parent: Option<WeakMint<PixelConfig>>,
}

impl PixelConfig {
    /// A root mint over a fresh, all-white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_canvas(Arc::new(Canvas::new(width, height)))
    }

    pub fn with_canvas(canvas: Arc<Canvas>) -> Self {
        Self {
            canvas,
            parent: None,
        }
    }

    fn child_of(parent: &PixelMint) -> Self {
        Self {
            canvas: Arc::clone(&parent.canvas),
            parent: parent.this.get().cloned(),
        }
    }
}

impl fmt::Debug for PixelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelConfig")
            .field("canvas", &self.canvas)
            .field("child", &self.parent.is_some())
            .finish()
    }
}

impl Configuration for PixelConfig {
    type Ops = PixelOps;
    type Keeper = RevocableMintKeeper<PixelOps>;
    type PaymentTrait = PixelPayment;
    type PurseTrait = PixelPurse;
    type MintTrait = PixelMint;
    type AssayTrait = PixelAssay;

    fn extent_ops(&self) -> PixelOps {
        ListExtentOps::new(self.canvas.policy())
    }

    fn make_mint_keeper(&self, unit_ops: &UnitOps<PixelOps>) -> Self::Keeper {
        RevocableMintKeeper::new(unit_ops)
    }

    fn make_payment_trait(&self, _core: &PaymentCore<Self>) -> PixelPayment {
        PixelPayment {
            canvas: Arc::clone(&self.canvas),
            this: OnceLock::new(),
        }
    }

    fn make_purse_trait(&self, _core: &PurseCore<Self>) -> PixelPurse {
        PixelPurse {
            canvas: Arc::clone(&self.canvas),
            this: OnceLock::new(),
        }
    }

    fn make_mint_trait(&self, _unit_ops: &UnitOps<PixelOps>) -> PixelMint {
        PixelMint {
            canvas: Arc::clone(&self.canvas),
            parent: self.parent.clone(),
            this: OnceLock::new(),
            child: OnceLock::new(),
        }
    }

    fn make_assay_trait(&self, _unit_ops: &UnitOps<PixelOps>) -> PixelAssay {
        PixelAssay {
            canvas: Arc::clone(&self.canvas),
            parent: self.parent.clone(),
        }
    }

    fn bind_payment_trait(&self, ext: &PixelPayment, payment: &Payment<Self>) {
        if ext.this.set(payment.downgrade()).is_err() {
            warn!(payment = %payment.id(), "pixel payment extension already bound");
        }
    }

    fn bind_purse_trait(&self, ext: &PixelPurse, purse: &Purse<Self>) {
        if ext.this.set(purse.downgrade()).is_err() {
            warn!(purse = %purse.id(), "pixel purse extension already bound");
        }
    }

    fn bind_mint_trait(&self, ext: &PixelMint, mint: &Mint<Self>) {
        if ext.this.set(mint.downgrade()).is_err() {
            warn!(label = %mint.label(), "pixel mint extension already bound");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mint and Assay extensions
// ─────────────────────────────────────────────────────────────────────────────

pub struct PixelMint {
    canvas: Arc<Canvas>,
    parent: Option<WeakMint<PixelConfig>>,
    this: OnceLock<WeakMint<PixelConfig>>,
    child: OnceLock<Mint<PixelConfig>>,
}

impl PixelMint {
    fn mint(&self) -> Result<Mint<PixelConfig>> {
        self.this
            .get()
            .ok_or(ConfigError::Unbound("mint"))?
            .upgrade()
            .ok_or(ConfigError::Released("mint"))
    }

    /// Take `units` back from wherever they are, here and in every
    /// descendant mint. Returns what was destroyed in this mint.
    ///
    /// Each mint in the chain commits on its own. Once this mint has
    /// destroyed its pixels the result stands; a failure further down is
    /// logged and leaves the pixels still delegated in that descendant.
    pub fn revoke(&self, units: &PixelUnits) -> Result<PixelUnits> {
        let mint = self.mint()?;
        let units = mint.assay().coerce(units)?;

        // Re-brand for the child before touching anything here.
        let delegated = match self.child.get() {
            Some(child) => Some((child, child.assay().make_units(units.extent().clone())?)),
            None => None,
        };

        let destroyed = mint.destroy(&units)?;
        if let Some((child, child_units)) = delegated {
            if let Err(err) = child.ext().revoke(&child_units) {
                warn!(
                    label = %mint.label(),
                    child = %child.label(),
                    error = %err,
                    "revocation did not reach child mint"
                );
            }
        }

        debug!(label = %mint.label(), pixels = destroyed.extent().len(), "pixels revoked");
        Ok(destroyed)
    }

    /// The mint used to delegate this mint's pixels, created on first use.
    pub fn child_mint(&self) -> Result<Mint<PixelConfig>> {
        if let Some(child) = self.child.get() {
            return Ok(child.clone());
        }
        let name = format!("{} child", self.mint()?.label().alleged_name());
        let child = self
            .child
            .get_or_init(|| Mint::new(PixelConfig::child_of(self), &name));
        Ok(child.clone())
    }

    pub fn parent_mint(&self) -> Option<Mint<PixelConfig>> {
        self.parent.as_ref()?.upgrade()
    }

    pub fn canvas(&self) -> &Arc<Canvas> {
        &self.canvas
    }
}

pub struct PixelAssay {
    canvas: Arc<Canvas>,
    parent: Option<WeakMint<PixelConfig>>,
}

impl PixelAssay {
    pub fn parent_assay(&self) -> Option<Assay<PixelConfig>> {
        Some(self.parent.as_ref()?.upgrade()?.assay())
    }

    pub fn canvas(&self) -> &Arc<Canvas> {
        &self.canvas
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment and Purse extensions
// ─────────────────────────────────────────────────────────────────────────────

pub struct PixelPayment {
    canvas: Arc<Canvas>,
    this: OnceLock<WeakPayment<PixelConfig>>,
}

impl PixelPayment {
    /// A use object bound to this payment's identity.
    ///
    /// Unlike seats, unwrapping a pixel does not spend it. The use object
    /// works while this exact payment is live and holds the pixel, so
    /// claiming the payment (new identity) disables it.
    pub fn unwrap(&self) -> Result<PixelUseObj> {
        let payment = self
            .this
            .get()
            .ok_or(ConfigError::Unbound("payment"))?
            .upgrade()
            .ok_or(ConfigError::Released("payment"))?;
        Ok(PixelUseObj {
            holder: PixelHolder::Payment(payment),
            canvas: Arc::clone(&self.canvas),
        })
    }
}

pub struct PixelPurse {
    canvas: Arc<Canvas>,
    this: OnceLock<WeakPurse<PixelConfig>>,
}

impl PixelPurse {
    /// A use object bound to this purse. It stops working for pixels that
    /// leave the purse by withdrawal or revocation.
    pub fn unwrap(&self) -> Result<PixelUseObj> {
        let purse = self
            .this
            .get()
            .ok_or(ConfigError::Unbound("purse"))?
            .upgrade()
            .ok_or(ConfigError::Released("purse"))?;
        Ok(PixelUseObj {
            holder: PixelHolder::Purse(purse),
            canvas: Arc::clone(&self.canvas),
        })
    }
}

enum PixelHolder {
    Payment(Payment<PixelConfig>),
    Purse(Purse<PixelConfig>),
}

impl PixelHolder {
    fn balance(&self) -> Result<PixelUnits> {
        let balance = match self {
            PixelHolder::Payment(payment) => payment.balance(),
            PixelHolder::Purse(purse) => purse.balance(),
        };
        Ok(balance?)
    }

    fn describe(&self) -> String {
        match self {
            PixelHolder::Payment(payment) => payment.id().to_string(),
            PixelHolder::Purse(purse) => purse.id().to_string(),
        }
    }
}

/// The right to recolour the pixels a holder currently has.
pub struct PixelUseObj {
    holder: PixelHolder,
    canvas: Arc<Canvas>,
}

impl PixelUseObj {
    pub fn change_color(&self, pixel: Pixel, color: Color) -> Result<()> {
        let balance = self.holder.balance()?;
        if !balance.extent().contains(&pixel) {
            return Err(ConfigError::NotHeld(format!(
                "{} does not hold pixel {pixel}",
                self.holder.describe()
            )));
        }
        self.canvas.set_color(pixel, color)
    }

    pub fn color_at(&self, pixel: Pixel) -> Result<Color> {
        self.canvas.color_at(pixel)
    }
}
