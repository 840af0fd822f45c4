//! # Rights Kernel Testkit
//!
//! Testing utilities for the Rights Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: pinned canonical bytes of revocation index keys
//! - **Generators**: Proptest strategies for amounts, pixel sets and random
//!   ledger sessions
//! - **Fixtures**: ready-made mints and purses, plus a driver that applies
//!   generated ops and records what each one consumed
//!
//! ## Golden Vectors
//!
//! ```rust
//! use rights_kernel_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hex}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use rights_kernel_testkit::{NatFixture, SessionParams};
//!
//! proptest! {
//!     #[test]
//!     fn value_is_conserved(params: SessionParams) {
//!         let mut fixture = NatFixture::new(&params.balances);
//!         for op in &params.ops {
//!             fixture.apply(op);
//!         }
//!         let outstanding = *fixture.mint.outstanding().unwrap().extent();
//!         prop_assert_eq!(outstanding, fixture.expected_outstanding());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use rights_kernel_testkit::fixtures::PixelFixture;
//!
//! let fixture = PixelFixture::striped(4, 4, 2);
//! assert_eq!(fixture.held().len(), 16);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{seeded_fixtures, NatFixture, OpOutcome, PixelFixture};
pub use generators::{ledger_op, pixel_set, LedgerOp, SessionParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
