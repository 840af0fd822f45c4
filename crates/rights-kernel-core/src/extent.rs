//! ExtentOps: the pluggable value algebra behind every Units.
//!
//! A strategy has no identity and no storage. It only decides which extents
//! are well formed and how they combine. The kernel never inspects an extent
//! itself; it always asks the strategy.

use std::cmp::Ordering;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Algebra over an opaque extent payload.
///
/// Laws every implementation upholds:
/// - `with(a, empty()) == a` and `without(a, a)` is empty.
/// - `includes(with(a, b), b)` whenever `with` succeeds.
/// - `without(whole, part)` fails exactly when `!includes(whole, part)`.
pub trait ExtentOps: Clone + Send + Sync + 'static {
    /// The raw payload this strategy understands.
    type Extent: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Strategy selector name, e.g. `"natExtentOps"`.
    fn name(&self) -> &'static str;

    /// Validate `extent` and return it in normal form.
    fn insist_kind(&self, extent: Self::Extent) -> Result<Self::Extent>;

    fn empty(&self) -> Self::Extent;

    fn is_empty(&self, extent: &Self::Extent) -> bool;

    /// Does `whole` cover every part of `part`?
    fn includes(&self, whole: &Self::Extent, part: &Self::Extent) -> bool;

    fn equals(&self, left: &Self::Extent, right: &Self::Extent) -> bool;

    /// Union. Fails if the result is not representable.
    fn with(&self, left: &Self::Extent, right: &Self::Extent) -> Result<Self::Extent>;

    /// Covering subtraction. Fails if `part` is not included in `whole`.
    fn without(&self, whole: &Self::Extent, part: &Self::Extent) -> Result<Self::Extent>;
}

/// Strategies whose extents are sets of individually addressable elements.
///
/// The revocation-capable ledger needs this to index holders per element.
pub trait ElementwiseOps: ExtentOps {
    type Element: Clone + fmt::Debug + Send + Sync + Serialize + 'static;

    fn elements(&self, extent: &Self::Extent) -> Vec<Self::Element>;

    /// An extent holding exactly `element`.
    fn singleton(&self, element: Self::Element) -> Self::Extent;
}

/// Item-level rules for the List and Uni strategies.
///
/// `compare` and `same` must agree: two items are the same element exactly
/// when they compare `Equal`.
pub trait ItemPolicy<T>: Clone + Send + Sync + 'static {
    /// Reject malformed items. The error string becomes the reason of an
    /// [`CoreError::InvalidExtent`](crate::CoreError::InvalidExtent).
    fn insist_item(&self, _item: &T) -> std::result::Result<(), String> {
        Ok(())
    }

    fn compare(&self, left: &T, right: &T) -> Ordering;

    fn same(&self, left: &T, right: &T) -> bool {
        self.compare(left, right) == Ordering::Equal
    }
}

/// Items ordered by their own `Ord` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord> ItemPolicy<T> for NaturalOrder {
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}
