//! # Rights Kernel Keeper
//!
//! Ledger abstraction for the Rights Kernel. Every mint owns exactly one
//! keeper, which maps each live purse and payment to its current units.
//!
//! ## Overview
//!
//! The kernel reads and writes balances only through the [`MintKeeper`]
//! trait. Two implementations are provided: [`BasicMintKeeper`] for plain
//! assets and [`RevocableMintKeeper`], which also tracks which handle holds
//! each individual element so an issuer can revoke it.
//!
//! ## Key Types
//!
//! - [`MintKeeper`] - The ledger interface used by the kernel
//! - [`RevocableKeeper`] - Adds `holder_of` and `destroy`
//! - [`BasicMintKeeper`] - Purse map plus payment map
//! - [`RevocableMintKeeper`] - Basic keeper plus an element index
//! - [`Holder`], [`PurseId`], [`PaymentId`] - Ledger keys
//!
//! ## Usage
//!
//! ```rust
//! use rights_kernel_core::{Label, NatExtentOps, UnitOps};
//! use rights_kernel_keeper::{BasicMintKeeper, Holder, MintKeeper, PurseId};
//!
//! let ops = UnitOps::new(Label::new("moola"), NatExtentOps);
//! let mut keeper = BasicMintKeeper::new(&ops);
//!
//! let purse = Holder::Purse(PurseId(0));
//! keeper.record_new(purse, ops.make(10).unwrap()).unwrap();
//! assert_eq!(*keeper.get_units(purse).unwrap().extent(), 10);
//! ```
//!
//! ## Design Notes
//!
//! - **Exactly-once**: a removed handle has no entry, so every later lookup
//!   fails with `NotFound`
//! - **Label check on write**: foreign units never enter a ledger
//! - **Canonical element keys**: the revocation index keys elements by
//!   their CBOR encoding on every path

pub mod asset;
pub mod error;
pub mod memory;
pub mod revocable;
pub mod traits;
pub mod types;

pub use asset::AssetKeeper;
pub use error::{KeeperError, Result};
pub use memory::BasicMintKeeper;
pub use revocable::{ElementKey, RevocableMintKeeper};
pub use traits::{MintKeeper, RevocableKeeper};
pub use types::{Holder, PaymentId, PurseId};
