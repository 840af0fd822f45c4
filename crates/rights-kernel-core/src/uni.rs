//! Uni strategy: exactly one indivisible structured record, or nothing.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::extent::{ElementwiseOps, ExtentOps, ItemPolicy, NaturalOrder};

const NAME: &str = "uniExtentOps";

/// Extents are `Option<T>`; `None` is the empty extent.
///
/// Union and subtraction are degenerate. Two non-empty extents can never be
/// combined, and the only non-trivial subtraction removes the whole record.
pub struct UniExtentOps<T, P = NaturalOrder> {
    policy: P,
    _item: PhantomData<fn() -> T>,
}

impl<T, P: ItemPolicy<T>> UniExtentOps<T, P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            _item: PhantomData,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<T, P: ItemPolicy<T> + Default> Default for UniExtentOps<T, P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<T, P: Clone> Clone for UniExtentOps<T, P> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            _item: PhantomData,
        }
    }
}

impl<T, P: fmt::Debug> fmt::Debug for UniExtentOps<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniExtentOps")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, P> ExtentOps for UniExtentOps<T, P>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
{
    type Extent = Option<T>;

    fn name(&self) -> &'static str {
        NAME
    }

    fn insist_kind(&self, extent: Option<T>) -> Result<Option<T>> {
        if let Some(item) = &extent {
            self.policy
                .insist_item(item)
                .map_err(|reason| CoreError::invalid(NAME, reason))?;
        }
        Ok(extent)
    }

    fn empty(&self) -> Option<T> {
        None
    }

    fn is_empty(&self, extent: &Option<T>) -> bool {
        extent.is_none()
    }

    fn includes(&self, whole: &Option<T>, part: &Option<T>) -> bool {
        match (whole, part) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(w), Some(p)) => self.policy.same(w, p),
        }
    }

    fn equals(&self, left: &Option<T>, right: &Option<T>) -> bool {
        match (left, right) {
            (None, None) => true,
            (Some(l), Some(r)) => self.policy.same(l, r),
            _ => false,
        }
    }

    fn with(&self, left: &Option<T>, right: &Option<T>) -> Result<Option<T>> {
        match (left, right) {
            (None, other) | (other, None) => Ok(other.clone()),
            (Some(_), Some(_)) => Err(CoreError::Indivisible { strategy: NAME }),
        }
    }

    fn without(&self, whole: &Option<T>, part: &Option<T>) -> Result<Option<T>> {
        match part {
            None => Ok(whole.clone()),
            Some(_) if self.equals(whole, part) => Ok(None),
            Some(_) => Err(CoreError::NotIncluded { strategy: NAME }),
        }
    }
}

impl<T, P> ElementwiseOps for UniExtentOps<T, P>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
{
    type Element = T;

    fn elements(&self, extent: &Option<T>) -> Vec<T> {
        extent.iter().cloned().collect()
    }

    fn singleton(&self, element: T) -> Option<T> {
        Some(element)
    }
}
