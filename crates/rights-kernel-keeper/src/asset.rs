//! AssetKeeper: one identity-keyed map from handle to units.

use std::collections::BTreeMap;

use rights_kernel_core::{ExtentOps, Units};

use crate::error::{KeeperError, Result};
use crate::types::Holder;

/// Units per handle for one kind of handle (purses or payments).
pub struct AssetKeeper<K, O: ExtentOps> {
    entries: BTreeMap<K, Units<O>>,
}

impl<K, O> AssetKeeper<K, O>
where
    K: Copy + Ord + Into<Holder>,
    O: ExtentOps,
{
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn record_new(&mut self, key: K, units: Units<O>) -> Result<()> {
        if self.entries.contains_key(&key) {
            return Err(KeeperError::AlreadyRecorded(key.into()));
        }
        self.entries.insert(key, units);
        Ok(())
    }

    pub fn update_units(&mut self, key: K, units: Units<O>) -> Result<()> {
        let slot = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| KeeperError::NotFound(key.into()))?;
        *slot = units;
        Ok(())
    }

    pub fn get_units(&self, key: K) -> Result<&Units<O>> {
        self.entries
            .get(&key)
            .ok_or_else(|| KeeperError::NotFound(key.into()))
    }

    pub fn has(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn remove(&mut self, key: K) -> Result<Units<O>> {
        self.entries
            .remove(&key)
            .ok_or_else(|| KeeperError::NotFound(key.into()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }
}

impl<K, O> Default for AssetKeeper<K, O>
where
    K: Copy + Ord + Into<Holder>,
    O: ExtentOps,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentId;
    use rights_kernel_core::{Label, NatExtentOps, UnitOps};

    #[test]
    fn test_record_get_remove() {
        let ops = UnitOps::new(Label::new("moola"), NatExtentOps);
        let mut keeper: AssetKeeper<PaymentId, NatExtentOps> = AssetKeeper::new();
        let id = PaymentId(1);

        keeper.record_new(id, ops.make(5).unwrap()).unwrap();
        assert_eq!(*keeper.get_units(id).unwrap().extent(), 5);
        assert!(matches!(
            keeper.record_new(id, ops.make(1).unwrap()),
            Err(KeeperError::AlreadyRecorded(_))
        ));

        keeper.remove(id).unwrap();
        assert!(!keeper.has(id));
        assert_eq!(
            keeper.get_units(id).unwrap_err(),
            KeeperError::NotFound(Holder::Payment(id))
        );
        assert!(keeper.update_units(id, ops.make(2).unwrap()).is_err());
    }
}
