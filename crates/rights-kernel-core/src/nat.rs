//! Nat strategy: plain fungible quantities.

use crate::error::{CoreError, Result};
use crate::extent::ExtentOps;

const NAME: &str = "natExtentOps";

/// Extents are natural numbers; union is checked addition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NatExtentOps;

impl NatExtentOps {
    pub fn new() -> Self {
        Self
    }
}

impl ExtentOps for NatExtentOps {
    type Extent = u64;

    fn name(&self) -> &'static str {
        NAME
    }

    fn insist_kind(&self, extent: u64) -> Result<u64> {
        // Non-negativity is carried by the type.
        Ok(extent)
    }

    fn empty(&self) -> u64 {
        0
    }

    fn is_empty(&self, extent: &u64) -> bool {
        *extent == 0
    }

    fn includes(&self, whole: &u64, part: &u64) -> bool {
        whole >= part
    }

    fn equals(&self, left: &u64, right: &u64) -> bool {
        left == right
    }

    fn with(&self, left: &u64, right: &u64) -> Result<u64> {
        left
            .checked_add(*right)
            .ok_or(CoreError::Overflow { strategy: NAME })
    }

    fn without(&self, whole: &u64, part: &u64) -> Result<u64> {
        whole
            .checked_sub(*part)
            .ok_or(CoreError::NotIncluded { strategy: NAME })
    }
}
