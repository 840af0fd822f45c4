//! # Rights Kernel Configurations
//!
//! Ready-made [`Configuration`](rights_kernel::Configuration)s built on the
//! kernel.
//!
//! ## Overview
//!
//! - **Use rights** ([`use_rights`]): indivisible items that are spent by
//!   `unwrap()` to obtain a use object. [`seat`] and [`invite`] specialize
//!   it for contract seats and invitation records.
//! - **Pixels** ([`pixel`]): revocable sets of canvas cells. Each pixel mint
//!   can spawn a child mint for delegation, and revocation cascades from
//!   parent to child. Holders recolour pixels through a use object that
//!   only works while they still hold them.
//!
//! ## Usage
//!
//! ```rust
//! use rights_kernel::Mint;
//! use rights_kernel_configs::{Color, Pixel, PixelConfig};
//!
//! let mint = Mint::new(PixelConfig::new(8, 8), "pixels");
//! let purse = mint.mint(vec![Pixel::new(0, 0)], Some("alice")).unwrap();
//!
//! let brush = purse.ext().unwrap().unwrap();
//! brush.change_color(Pixel::new(0, 0), Color::parse("#336699").unwrap()).unwrap();
//!
//! let all = mint.assay().make_units(vec![Pixel::new(0, 0)]).unwrap();
//! mint.ext().revoke(&all).unwrap();
//! assert!(brush.change_color(Pixel::new(0, 0), Color::WHITE).is_err());
//! ```

pub mod canvas;
pub mod error;
pub mod invite;
pub mod pixel;
pub mod seat;
pub mod use_rights;

pub use canvas::{Canvas, Color, Pixel, PixelPolicy};
pub use error::{ConfigError, Result};
pub use invite::{canonical_json, invite_config, is_comparable, ComparablePolicy, InviteConfig};
pub use pixel::{
    PixelAssay, PixelConfig, PixelMint, PixelOps, PixelPayment, PixelPurse, PixelUnits,
    PixelUseObj,
};
pub use seat::{seat_config, SeatConfig, SeatDescriptor, SeatPolicy};
pub use use_rights::{UseObjectMaker, UseRightsConfig, UseRightsPayment, UseRightsPurse};
