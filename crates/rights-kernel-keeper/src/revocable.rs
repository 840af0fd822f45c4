//! Revocation-capable ledger.
//!
//! Alongside the usual handle -> units maps, this keeper indexes every
//! individual extent element to the handle currently holding it. That index
//! lets an issuer take specific rights back wherever they are, without the
//! holder's cooperation.
//!
//! Index keys are the canonical CBOR encoding of the element. The same
//! encoding is used on insert and on delete, so an entry can never be left
//! behind under a differently-normalized key.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use rights_kernel_core::{ElementwiseOps, UnitOps, Units};

use crate::error::{KeeperError, Result};
use crate::memory::BasicMintKeeper;
use crate::traits::{MintKeeper, RevocableKeeper};
use crate::types::Holder;

/// Canonical byte form of one extent element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementKey(Bytes);

impl ElementKey {
    pub fn encode<T: Serialize>(element: &T) -> Result<Self> {
        let mut buf = Vec::new();
        ciborium::into_writer(element, &mut buf)
            .map_err(|e| KeeperError::Encoding(e.to_string()))?;
        Ok(Self(Bytes::from(buf)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A [`BasicMintKeeper`] plus an element -> holder index.
pub struct RevocableMintKeeper<O: ElementwiseOps> {
    inner: BasicMintKeeper<O>,
    index: HashMap<ElementKey, Holder>,
}

impl<O: ElementwiseOps> RevocableMintKeeper<O> {
    pub fn new(unit_ops: &UnitOps<O>) -> Self {
        Self {
            inner: BasicMintKeeper::new(unit_ops),
            index: HashMap::new(),
        }
    }

    /// Number of indexed elements. Equals the total element count held by
    /// all live handles.
    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }

    fn keys_of(&self, units: &Units<O>) -> Result<Vec<ElementKey>> {
        self.inner
            .unit_ops()
            .ops()
            .elements(units.extent())
            .iter()
            .map(ElementKey::encode)
            .collect()
    }

    /// Drop index entries that still point at `holder`. An entry already
    /// claimed by another handle belongs to that handle and stays.
    fn unindex(&mut self, keys: &[ElementKey], holder: Holder) {
        for key in keys {
            if self.index.get(key) == Some(&holder) {
                self.index.remove(key);
            }
        }
    }

    fn index_all(&mut self, keys: Vec<ElementKey>, holder: Holder) {
        for key in keys {
            self.index.insert(key, holder);
        }
    }
}

impl<O: ElementwiseOps> MintKeeper<O> for RevocableMintKeeper<O> {
    fn record_new(&mut self, holder: Holder, units: Units<O>) -> Result<()> {
        let keys = self.keys_of(&units)?;
        self.inner.record_new(holder, units)?;
        self.index_all(keys, holder);
        Ok(())
    }

    fn update_units(&mut self, holder: Holder, units: Units<O>) -> Result<()> {
        let old_keys = self.keys_of(self.inner.get_units(holder)?)?;
        let new_keys = self.keys_of(&units)?;
        self.inner.update_units(holder, units)?;
        self.unindex(&old_keys, holder);
        self.index_all(new_keys, holder);
        Ok(())
    }

    fn get_units(&self, holder: Holder) -> Result<&Units<O>> {
        self.inner.get_units(holder)
    }

    fn has(&self, holder: Holder) -> bool {
        self.inner.has(holder)
    }

    fn insist_fresh(&self, units: &Units<O>) -> Result<()> {
        for key in self.keys_of(units)? {
            if let Some(holder) = self.index.get(&key) {
                return Err(KeeperError::ElementHeld(*holder));
            }
        }
        Ok(())
    }

    fn remove(&mut self, holder: Holder) -> Result<Units<O>> {
        let keys = self.keys_of(self.inner.get_units(holder)?)?;
        let units = self.inner.remove(holder)?;
        self.unindex(&keys, holder);
        Ok(units)
    }

    fn holders(&self) -> Vec<Holder> {
        self.inner.holders()
    }

    fn purse_count(&self) -> usize {
        self.inner.purse_count()
    }

    fn payment_count(&self) -> usize {
        self.inner.payment_count()
    }
}

impl<O: ElementwiseOps> RevocableKeeper<O> for RevocableMintKeeper<O> {
    fn holder_of(&self, element: &O::Element) -> Result<Option<Holder>> {
        Ok(self.index.get(&ElementKey::encode(element)?).copied())
    }

    fn destroy(&mut self, target: &Units<O>) -> Result<Units<O>> {
        let unit_ops = self.inner.unit_ops().clone();
        let target = unit_ops.coerce(target)?;

        // Work out every holder's new balance before touching anything.
        let mut pending: Vec<(Holder, Units<O>)> = Vec::new();
        let mut destroyed = unit_ops.empty();
        for element in unit_ops.ops().elements(target.extent()) {
            let Some(holder) = self.holder_of(&element)? else {
                continue;
            };
            let single = unit_ops.make(unit_ops.ops().singleton(element))?;
            let current = match pending.iter().position(|(h, _)| *h == holder) {
                Some(pos) => pending[pos].1.clone(),
                None => self
                    .inner
                    .get_units(holder)
                    .map_err(|_| {
                        KeeperError::IndexOutOfSync(format!("index points at dead {holder}"))
                    })?
                    .clone(),
            };
            let remaining = unit_ops.without(&current, &single)?;
            destroyed = unit_ops.with(&destroyed, &single)?;
            match pending.iter_mut().find(|(h, _)| *h == holder) {
                Some(slot) => slot.1 = remaining,
                None => pending.push((holder, remaining)),
            }
        }

        let touched = pending.len();
        for (holder, remaining) in pending {
            self.update_units(holder, remaining)?;
        }
        debug!(
            label = %unit_ops.label(),
            holders = touched,
            "destroyed revoked elements"
        );
        Ok(destroyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentId, PurseId};
    use rights_kernel_core::{Label, ListExtentOps};

    type Ops = ListExtentOps<(u32, u32)>;

    fn setup() -> (UnitOps<Ops>, RevocableMintKeeper<Ops>) {
        let ops = UnitOps::new(Label::new("pixels"), ListExtentOps::default());
        let keeper = RevocableMintKeeper::new(&ops);
        (ops, keeper)
    }

    #[test]
    fn test_index_follows_moves() {
        let (ops, mut keeper) = setup();
        let purse = Holder::Purse(PurseId(1));
        let payment = Holder::Payment(PaymentId(2));

        keeper
            .record_new(purse, ops.make(vec![(1, 4), (2, 2)]).unwrap())
            .unwrap();
        assert_eq!(keeper.holder_of(&(1, 4)).unwrap(), Some(purse));

        // Withdraw order: the payment is recorded before the purse shrinks.
        keeper
            .record_new(payment, ops.make(vec![(1, 4)]).unwrap())
            .unwrap();
        keeper
            .update_units(purse, ops.make(vec![(2, 2)]).unwrap())
            .unwrap();

        assert_eq!(keeper.holder_of(&(1, 4)).unwrap(), Some(payment));
        assert_eq!(keeper.holder_of(&(2, 2)).unwrap(), Some(purse));
        assert_eq!(keeper.indexed_len(), 2);

        keeper.remove(payment).unwrap();
        assert_eq!(keeper.holder_of(&(1, 4)).unwrap(), None);
        assert_eq!(keeper.indexed_len(), 1);
    }

    #[test]
    fn test_insist_fresh_rejects_held_element() {
        let (ops, mut keeper) = setup();
        let purse = Holder::Purse(PurseId(1));
        keeper
            .record_new(purse, ops.make(vec![(7, 7)]).unwrap())
            .unwrap();

        let again = ops.make(vec![(0, 1), (7, 7)]).unwrap();
        assert_eq!(keeper.insist_fresh(&again), Err(KeeperError::ElementHeld(purse)));
        assert!(keeper.insist_fresh(&ops.make(vec![(0, 1)]).unwrap()).is_ok());
        assert!(keeper.insist_fresh(&ops.empty()).is_ok());

        keeper.destroy(&ops.make(vec![(7, 7)]).unwrap()).unwrap();
        assert!(keeper.insist_fresh(&again).is_ok());
    }

    #[test]
    fn test_destroy_hits_only_target() {
        let (ops, mut keeper) = setup();
        let first = Holder::Purse(PurseId(1));
        let second = Holder::Purse(PurseId(2));
        keeper.record_new(first, ops.make(vec![(1, 4)]).unwrap()).unwrap();
        keeper.record_new(second, ops.make(vec![(2, 2)]).unwrap()).unwrap();

        let destroyed = keeper.destroy(&ops.make(vec![(1, 4)]).unwrap()).unwrap();

        assert_eq!(destroyed.extent(), &vec![(1, 4)]);
        assert!(keeper.get_units(first).unwrap().extent().is_empty());
        assert_eq!(keeper.get_units(second).unwrap().extent(), &vec![(2, 2)]);
        assert_eq!(keeper.holder_of(&(1, 4)).unwrap(), None);
    }

    #[test]
    fn test_destroy_spans_holders_and_skips_unheld() {
        let (ops, mut keeper) = setup();
        let purse = Holder::Purse(PurseId(1));
        let payment = Holder::Payment(PaymentId(2));
        keeper
            .record_new(purse, ops.make(vec![(0, 0), (0, 1)]).unwrap())
            .unwrap();
        keeper
            .record_new(payment, ops.make(vec![(5, 5), (6, 6)]).unwrap())
            .unwrap();

        let target = ops.make(vec![(0, 0), (0, 1), (6, 6), (9, 9)]).unwrap();
        let destroyed = keeper.destroy(&target).unwrap();

        assert_eq!(destroyed.extent(), &vec![(0, 0), (0, 1), (6, 6)]);
        assert!(keeper.get_units(purse).unwrap().extent().is_empty());
        assert_eq!(keeper.get_units(payment).unwrap().extent(), &vec![(5, 5)]);
        assert_eq!(keeper.indexed_len(), 1);
    }

    #[test]
    fn test_destroy_rejects_foreign_label() {
        let (_, mut keeper) = setup();
        let other: UnitOps<Ops> = UnitOps::new(Label::new("pixels"), ListExtentOps::default());
        let err = keeper.destroy(&other.make(vec![(1, 1)]).unwrap()).unwrap_err();
        assert!(matches!(err, KeeperError::Core(_)));
    }

    #[test]
    fn test_element_key_is_canonical() {
        let a = ElementKey::encode(&(1u32, 4u32)).unwrap();
        let b = ElementKey::encode(&(1u32, 4u32)).unwrap();
        assert_eq!(a, b);
        // CBOR array(2) [1, 4]
        assert_eq!(a.as_bytes(), &[0x82, 0x01, 0x04]);
    }

    proptest::proptest! {
        #[test]
        fn test_index_matches_ledger_after_destroy(
            cells in proptest::collection::btree_set((0u32..8, 0u32..8), 0..32),
            doomed in proptest::collection::btree_set((0u32..8, 0u32..8), 0..32),
        ) {
            let (ops, mut keeper) = setup();
            let holders = [Holder::Purse(PurseId(1)), Holder::Payment(PaymentId(2)), Holder::Purse(PurseId(3))];
            let mut shares = vec![Vec::new(); holders.len()];
            for (i, cell) in cells.iter().enumerate() {
                shares[i % holders.len()].push(*cell);
            }
            for (holder, share) in holders.iter().zip(shares) {
                keeper.record_new(*holder, ops.make(share).unwrap()).unwrap();
            }

            keeper.destroy(&ops.make(doomed.iter().copied().collect()).unwrap()).unwrap();

            let survivors = cells.difference(&doomed).count();
            proptest::prop_assert_eq!(keeper.indexed_len(), survivors);
            for holder in holders {
                for cell in keeper.get_units(holder).unwrap().extent().clone() {
                    proptest::prop_assert_eq!(keeper.holder_of(&cell).unwrap(), Some(holder));
                }
            }
        }
    }
}
