//! Units and UnitOps: branded amounts and the only place labels are checked.
//!
//! A [`Units`] can only be built by a [`UnitOps`], and only after the
//! strategy accepted its extent. Holding a `Units` value is therefore proof
//! that its extent was validated under its label, and re-coercing it costs a
//! single label comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::extent::ExtentOps;
use crate::label::Label;

/// A validated quantity of rights: `{ label, extent }`.
pub struct Units<O: ExtentOps> {
    label: Label,
    extent: O::Extent,
}

impl<O: ExtentOps> Units<O> {
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn extent(&self) -> &O::Extent {
        &self.extent
    }

    pub fn into_extent(self) -> O::Extent {
        self.extent
    }

    /// Strip the brand so the amount can travel as plain data.
    pub fn to_descriptor(&self) -> UnitsDescriptor<O::Extent> {
        UnitsDescriptor {
            label: self.label.clone(),
            extent: self.extent.clone(),
        }
    }
}

impl<O: ExtentOps> Clone for Units<O> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            extent: self.extent.clone(),
        }
    }
}

impl<O: ExtentOps> fmt::Debug for Units<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Units")
            .field("label", &self.label)
            .field("extent", &self.extent)
            .finish()
    }
}

impl<O: ExtentOps> Serialize for Units<O> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a, E> {
            label: &'a Label,
            extent: &'a E,
        }
        Wire {
            label: &self.label,
            extent: &self.extent,
        }
        .serialize(serializer)
    }
}

/// An unbranded amount, e.g. one that was deserialized.
///
/// Turning it back into [`Units`] goes through
/// [`UnitOps::coerce_descriptor`], which re-validates the extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsDescriptor<E> {
    pub label: Label,
    pub extent: E,
}

/// One label plus one strategy.
///
/// Every operation coerces its operands first, so a Units of another label
/// is rejected here and nowhere else needs to check.
pub struct UnitOps<O: ExtentOps> {
    label: Label,
    ops: O,
}

impl<O: ExtentOps> UnitOps<O> {
    pub fn new(label: Label, ops: O) -> Self {
        Self { label, ops }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    pub fn extent_ops_name(&self) -> &'static str {
        self.ops.name()
    }

    /// Validate `extent` and brand it with this label.
    pub fn make(&self, extent: O::Extent) -> Result<Units<O>> {
        let extent = self.ops.insist_kind(extent)?;
        Ok(Units {
            label: self.label.clone(),
            extent,
        })
    }

    /// Accept an already-branded Units of this label.
    pub fn coerce(&self, units: &Units<O>) -> Result<Units<O>> {
        self.insist_label(&units.label)?;
        Ok(units.clone())
    }

    /// Wrap a bare extent.
    pub fn coerce_extent(&self, extent: O::Extent) -> Result<Units<O>> {
        self.make(extent)
    }

    /// Re-validate and re-brand a foreign description with a matching label.
    pub fn coerce_descriptor(&self, descriptor: UnitsDescriptor<O::Extent>) -> Result<Units<O>> {
        self.insist_label(&descriptor.label)?;
        self.make(descriptor.extent)
    }

    pub fn extent(&self, units: &Units<O>) -> Result<O::Extent> {
        Ok(self.coerce(units)?.extent)
    }

    pub fn empty(&self) -> Units<O> {
        Units {
            label: self.label.clone(),
            extent: self.ops.empty(),
        }
    }

    pub fn is_empty(&self, units: &Units<O>) -> Result<bool> {
        self.insist_label(&units.label)?;
        Ok(self.ops.is_empty(&units.extent))
    }

    pub fn includes(&self, whole: &Units<O>, part: &Units<O>) -> Result<bool> {
        self.insist_label(&whole.label)?;
        self.insist_label(&part.label)?;
        Ok(self.ops.includes(&whole.extent, &part.extent))
    }

    pub fn equals(&self, left: &Units<O>, right: &Units<O>) -> Result<bool> {
        self.insist_label(&left.label)?;
        self.insist_label(&right.label)?;
        Ok(self.ops.equals(&left.extent, &right.extent))
    }

    pub fn with(&self, left: &Units<O>, right: &Units<O>) -> Result<Units<O>> {
        self.insist_label(&left.label)?;
        self.insist_label(&right.label)?;
        let extent = self.ops.with(&left.extent, &right.extent)?;
        Ok(Units {
            label: self.label.clone(),
            extent,
        })
    }

    pub fn without(&self, whole: &Units<O>, part: &Units<O>) -> Result<Units<O>> {
        self.insist_label(&whole.label)?;
        self.insist_label(&part.label)?;
        let extent = self.ops.without(&whole.extent, &part.extent)?;
        Ok(Units {
            label: self.label.clone(),
            extent,
        })
    }

    fn insist_label(&self, label: &Label) -> Result<()> {
        if *label != self.label {
            return Err(CoreError::LabelMismatch {
                expected: self.label.mint_id(),
                actual: label.mint_id(),
            });
        }
        Ok(())
    }
}

impl<O: ExtentOps> Clone for UnitOps<O> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            ops: self.ops.clone(),
        }
    }
}

impl<O: ExtentOps> fmt::Debug for UnitOps<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOps")
            .field("label", &self.label)
            .field("strategy", &self.ops.name())
            .finish()
    }
}
