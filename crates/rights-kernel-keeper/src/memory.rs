//! In-memory implementation of the MintKeeper trait.
//!
//! Two independent asset keepers, one for purses and one for payments.
//! Nothing is persisted; the ledger lives and dies with its mint.

use rights_kernel_core::{ExtentOps, UnitOps, Units};

use crate::asset::AssetKeeper;
use crate::error::Result;
use crate::traits::MintKeeper;
use crate::types::{Holder, PaymentId, PurseId};

/// The plain ledger used by most configurations.
pub struct BasicMintKeeper<O: ExtentOps> {
    unit_ops: UnitOps<O>,
    purses: AssetKeeper<PurseId, O>,
    payments: AssetKeeper<PaymentId, O>,
}

impl<O: ExtentOps> BasicMintKeeper<O> {
    /// Create an empty ledger for units of `unit_ops`' label.
    pub fn new(unit_ops: &UnitOps<O>) -> Self {
        Self {
            unit_ops: unit_ops.clone(),
            purses: AssetKeeper::new(),
            payments: AssetKeeper::new(),
        }
    }

    pub fn unit_ops(&self) -> &UnitOps<O> {
        &self.unit_ops
    }
}

impl<O: ExtentOps> MintKeeper<O> for BasicMintKeeper<O> {
    fn record_new(&mut self, holder: Holder, units: Units<O>) -> Result<()> {
        // Only units of this mint's label may enter its ledger.
        let units = self.unit_ops.coerce(&units)?;
        match holder {
            Holder::Purse(id) => self.purses.record_new(id, units),
            Holder::Payment(id) => self.payments.record_new(id, units),
        }
    }

    fn update_units(&mut self, holder: Holder, units: Units<O>) -> Result<()> {
        let units = self.unit_ops.coerce(&units)?;
        match holder {
            Holder::Purse(id) => self.purses.update_units(id, units),
            Holder::Payment(id) => self.payments.update_units(id, units),
        }
    }

    fn get_units(&self, holder: Holder) -> Result<&Units<O>> {
        match holder {
            Holder::Purse(id) => self.purses.get_units(id),
            Holder::Payment(id) => self.payments.get_units(id),
        }
    }

    fn has(&self, holder: Holder) -> bool {
        match holder {
            Holder::Purse(id) => self.purses.has(id),
            Holder::Payment(id) => self.payments.has(id),
        }
    }

    fn remove(&mut self, holder: Holder) -> Result<Units<O>> {
        match holder {
            Holder::Purse(id) => self.purses.remove(id),
            Holder::Payment(id) => self.payments.remove(id),
        }
    }

    fn holders(&self) -> Vec<Holder> {
        self.purses
            .keys()
            .map(Holder::Purse)
            .chain(self.payments.keys().map(Holder::Payment))
            .collect()
    }

    fn purse_count(&self) -> usize {
        self.purses.len()
    }

    fn payment_count(&self) -> usize {
        self.payments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeeperError;
    use rights_kernel_core::{CoreError, Label, NatExtentOps};

    fn setup() -> (UnitOps<NatExtentOps>, BasicMintKeeper<NatExtentOps>) {
        let ops = UnitOps::new(Label::new("moola"), NatExtentOps);
        let keeper = BasicMintKeeper::new(&ops);
        (ops, keeper)
    }

    #[test]
    fn test_purse_and_payment_maps_are_independent() {
        let (ops, mut keeper) = setup();
        keeper
            .record_new(Holder::Purse(PurseId(1)), ops.make(10).unwrap())
            .unwrap();
        keeper
            .record_new(Holder::Payment(PaymentId(1)), ops.make(3).unwrap())
            .unwrap();

        assert_eq!(*keeper.get_units(PurseId(1).into()).unwrap().extent(), 10);
        assert_eq!(*keeper.get_units(PaymentId(1).into()).unwrap().extent(), 3);
        assert_eq!(keeper.purse_count(), 1);
        assert_eq!(keeper.payment_count(), 1);
        assert_eq!(
            keeper.holders(),
            vec![Holder::Purse(PurseId(1)), Holder::Payment(PaymentId(1))]
        );
    }

    #[test]
    fn test_foreign_units_rejected() {
        let (_, mut keeper) = setup();
        let other = UnitOps::new(Label::new("moola"), NatExtentOps);
        let err = keeper
            .record_new(PurseId(1).into(), other.make(1).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            KeeperError::Core(CoreError::LabelMismatch { .. })
        ));
    }

    #[test]
    fn test_removed_payment_is_gone() {
        let (ops, mut keeper) = setup();
        let holder = Holder::Payment(PaymentId(9));
        keeper.record_new(holder, ops.make(4).unwrap()).unwrap();
        assert_eq!(*keeper.remove(holder).unwrap().extent(), 4);
        assert!(!keeper.has(holder));
        assert_eq!(keeper.remove(holder).unwrap_err(), KeeperError::NotFound(holder));
    }
}
