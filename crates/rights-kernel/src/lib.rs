//! # Rights Kernel
//!
//! The unified API for the Rights Kernel: mints, assays, purses and
//! payments over a conservation-preserving ledger.
//!
//! ## Overview
//!
//! A [`Mint`] is built from a [`Configuration`], which fixes the extent
//! algebra, the ledger implementation and the extension object attached to
//! each role. The mint is the only source of new value. Its [`Assay`]
//! reshapes payments (split, combine, claim, burn); [`Purse`]s hold value
//! long term (deposit, withdraw); [`Payment`]s carry value between holders
//! and are consumed by the first operation that uses them.
//!
//! ## Key Concepts
//!
//! - **Conservation**: only `mint` creates value, only `burn` and revocation
//!   destroy it.
//! - **Exactly-once**: a consumed payment is gone from the ledger; every
//!   later use fails with a stale-handle error.
//! - **Brand integrity**: units and handles of another mint are rejected.
//! - **No partial mutation**: every check runs before the first ledger
//!   write.
//!
//! ## Usage
//!
//! ```rust
//! use rights_kernel::{BasicConfig, Mint};
//!
//! let mint = Mint::new(BasicConfig, "moola");
//! let assay = mint.assay();
//! let purse = mint.mint(1000, None).unwrap();
//!
//! let payment = purse.withdraw(&assay.make_units(7).unwrap(), None).unwrap();
//! assert_eq!(*purse.balance().unwrap().extent(), 993);
//! assert_eq!(*payment.balance().unwrap().extent(), 7);
//! ```
//!
//! ## Re-exports
//!
//! - `rights_kernel::core` - Amount algebra (Label, Units, strategies)
//! - `rights_kernel::keeper` - Ledger abstraction

pub mod assay;
mod commit;
pub mod config;
pub mod error;
pub mod mint;
pub mod payment;
pub mod purse;

pub use rights_kernel_core as core;
pub use rights_kernel_keeper as keeper;

pub use assay::{Assay, WeakAssay};
pub use config::{BasicConfig, Configuration, ItemSetConfig, MintOptions};
pub use error::{KernelError, Result};
pub use mint::{Mint, WeakMint};
pub use payment::{Payment, PaymentCore, WeakPayment};
pub use purse::{Purse, PurseCore, WeakPurse};

pub use rights_kernel_core::{Label, UnitOps, Units, UnitsDescriptor};
pub use rights_kernel_keeper::{Holder, PaymentId, PurseId};
