//! # Rights Kernel Core
//!
//! Pure primitives for the Rights Kernel: labels, units, and the pluggable
//! extent algebras that give them meaning.
//!
//! This crate contains no ledger, no I/O, no identity of holders. It is pure
//! computation over amounts.
//!
//! ## Key Types
//!
//! - [`Label`] - The `{ mint identity, alleged name }` pair that brands amounts
//! - [`Units`] - A validated, branded quantity of rights
//! - [`UnitOps`] - One label plus one strategy; the only place labels are checked
//! - [`ExtentOps`] - The strategy trait, with three reference strategies:
//!   [`NatExtentOps`], [`ListExtentOps`], [`UniExtentOps`]
//!
//! ## Example
//!
//! ```rust
//! use rights_kernel_core::{Label, NatExtentOps, UnitOps};
//!
//! let ops = UnitOps::new(Label::new("moola"), NatExtentOps);
//! let total = ops.with(&ops.make(993).unwrap(), &ops.make(7).unwrap()).unwrap();
//! assert_eq!(*total.extent(), 1000);
//! ```

pub mod error;
pub mod extent;
pub mod label;
pub mod list;
pub mod nat;
pub mod types;
pub mod uni;
pub mod units;

pub use error::{CoreError, Result};
pub use extent::{ElementwiseOps, ExtentOps, ItemPolicy, NaturalOrder};
pub use label::Label;
pub use list::ListExtentOps;
pub use nat::NatExtentOps;
pub use types::MintId;
pub use uni::UniExtentOps;
pub use units::{UnitOps, Units, UnitsDescriptor};
