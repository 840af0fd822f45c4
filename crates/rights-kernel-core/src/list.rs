//! List strategy: deduplicated sets of unique, comparable items.
//!
//! Extents are kept sorted by the policy's comparator. Membership tests are
//! linear scans, which is fine for the item counts these rights carry.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::extent::{ElementwiseOps, ExtentOps, ItemPolicy, NaturalOrder};

const NAME: &str = "listExtentOps";

/// Extents are `Vec<T>` with no two items the same under `P`.
pub struct ListExtentOps<T, P = NaturalOrder> {
    policy: P,
    _item: PhantomData<fn() -> T>,
}

impl<T, P: ItemPolicy<T>> ListExtentOps<T, P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            _item: PhantomData,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    fn contains(&self, list: &[T], item: &T) -> bool {
        list.iter().any(|candidate| self.policy.same(candidate, item))
    }
}

impl<T, P: ItemPolicy<T> + Default> Default for ListExtentOps<T, P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<T, P: Clone> Clone for ListExtentOps<T, P> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            _item: PhantomData,
        }
    }
}

impl<T, P: fmt::Debug> fmt::Debug for ListExtentOps<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListExtentOps")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, P> ExtentOps for ListExtentOps<T, P>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
{
    type Extent = Vec<T>;

    fn name(&self) -> &'static str {
        NAME
    }

    fn insist_kind(&self, mut extent: Vec<T>) -> Result<Vec<T>> {
        for (index, item) in extent.iter().enumerate() {
            self.policy
                .insist_item(item)
                .map_err(|reason| CoreError::invalid(NAME, format!("item {index}: {reason}")))?;
        }
        extent.sort_by(|a, b| self.policy.compare(a, b));
        if let Some(pair) = extent.windows(2).find(|w| self.policy.same(&w[0], &w[1])) {
            return Err(CoreError::invalid(
                NAME,
                format!("duplicate item {:?}", pair[1]),
            ));
        }
        Ok(extent)
    }

    fn empty(&self) -> Vec<T> {
        Vec::new()
    }

    fn is_empty(&self, extent: &Vec<T>) -> bool {
        extent.is_empty()
    }

    fn includes(&self, whole: &Vec<T>, part: &Vec<T>) -> bool {
        part.iter().all(|item| self.contains(whole, item))
    }

    fn equals(&self, left: &Vec<T>, right: &Vec<T>) -> bool {
        self.includes(left, right) && self.includes(right, left)
    }

    fn with(&self, left: &Vec<T>, right: &Vec<T>) -> Result<Vec<T>> {
        let mut combined: Vec<T> = left.iter().chain(right.iter()).cloned().collect();
        combined.sort_by(|a, b| self.policy.compare(a, b));
        // Dedup by the equality predicate, not only by comparator ties.
        combined.dedup_by(|later, earlier| self.policy.same(earlier, later));
        Ok(combined)
    }

    fn without(&self, whole: &Vec<T>, part: &Vec<T>) -> Result<Vec<T>> {
        if !self.includes(whole, part) {
            return Err(CoreError::NotIncluded { strategy: NAME });
        }
        Ok(whole
            .iter()
            .filter(|item| !self.contains(part, item))
            .cloned()
            .collect())
    }
}

impl<T, P> ElementwiseOps for ListExtentOps<T, P>
where
    T: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    P: ItemPolicy<T>,
{
    type Element = T;

    fn elements(&self, extent: &Vec<T>) -> Vec<T> {
        extent.clone()
    }

    fn singleton(&self, element: T) -> Vec<T> {
        vec![element]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn ops() -> ListExtentOps<u32> {
        ListExtentOps::default()
    }

    #[test]
    fn test_insist_kind_sorts() {
        assert_eq!(ops().insist_kind(vec![3, 1, 2]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_insist_kind_rejects_duplicates() {
        let err = ops().insist_kind(vec![1, 2, 1]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidExtent { .. }));
    }

    #[test]
    fn test_with_merges_and_dedups() {
        assert_eq!(ops().with(&vec![1, 3], &vec![2, 3]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_without_removes_exactly_part() {
        assert_eq!(ops().without(&vec![1, 2, 3], &vec![2]).unwrap(), vec![1, 3]);
        let err = ops().without(&vec![1, 2], &vec![4]).unwrap_err();
        assert_eq!(err, CoreError::NotIncluded { strategy: NAME });
    }

    #[test]
    fn test_equals_ignores_order() {
        assert!(ops().equals(&vec![1, 2], &vec![2, 1]));
        assert!(!ops().equals(&vec![1, 2], &vec![1]));
    }

    /// Orders by the first field only but treats both fields as identity.
    #[derive(Clone)]
    struct CoarseOrder;

    impl ItemPolicy<(u8, u8)> for CoarseOrder {
        fn compare(&self, a: &(u8, u8), b: &(u8, u8)) -> Ordering {
            a.0.cmp(&b.0)
        }

        fn same(&self, a: &(u8, u8), b: &(u8, u8)) -> bool {
            a == b
        }

        fn insist_item(&self, item: &(u8, u8)) -> std::result::Result<(), String> {
            if item.1 > 9 {
                return Err("second field out of range".into());
            }
            Ok(())
        }
    }

    #[test]
    fn test_dedup_uses_equality_predicate() {
        let ops: ListExtentOps<(u8, u8), CoarseOrder> = ListExtentOps::new(CoarseOrder);
        // Comparator ties that are not the same item survive the merge.
        let merged = ops.with(&vec![(1, 1)], &vec![(1, 2)]).unwrap();
        assert_eq!(merged.len(), 2);
        let merged = ops.with(&vec![(1, 1)], &vec![(1, 1)]).unwrap();
        assert_eq!(merged, vec![(1, 1)]);
    }

    #[test]
    fn test_policy_rejects_items() {
        let ops: ListExtentOps<(u8, u8), CoarseOrder> = ListExtentOps::new(CoarseOrder);
        assert!(ops.insist_kind(vec![(1, 10)]).is_err());
    }

    proptest::proptest! {
        #[test]
        fn test_with_then_without_restores(
            a in proptest::collection::btree_set(0u32..64, 0..16),
            b in proptest::collection::btree_set(64u32..128, 0..16),
        ) {
            let ops = ops();
            let a: Vec<u32> = a.into_iter().collect();
            let b: Vec<u32> = b.into_iter().collect();
            let both = ops.with(&a, &b).unwrap();
            proptest::prop_assert!(ops.includes(&both, &a));
            proptest::prop_assert_eq!(ops.without(&both, &b).unwrap(), a);
        }
    }
}
