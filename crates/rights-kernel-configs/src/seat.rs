//! Seats: one structured record per right.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rights_kernel_core::ItemPolicy;

use crate::use_rights::{UseObjectMaker, UseRightsConfig};

/// A seat in some contract: who sits there and on what terms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatDescriptor {
    pub seat_id: u64,
    pub role: String,
    #[serde(default)]
    pub terms: BTreeMap<String, String>,
}

impl SeatDescriptor {
    pub fn new(seat_id: u64, role: &str) -> Self {
        Self {
            seat_id,
            role: role.to_string(),
            terms: BTreeMap::new(),
        }
    }

    pub fn with_term(mut self, key: &str, value: &str) -> Self {
        self.terms.insert(key.to_string(), value.to_string());
        self
    }
}

/// Seats need a role; identity is the whole record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeatPolicy;

impl ItemPolicy<SeatDescriptor> for SeatPolicy {
    fn insist_item(&self, seat: &SeatDescriptor) -> Result<(), String> {
        if seat.role.trim().is_empty() {
            return Err(format!("seat {} has no role", seat.seat_id));
        }
        Ok(())
    }

    fn compare(&self, left: &SeatDescriptor, right: &SeatDescriptor) -> Ordering {
        left.cmp(right)
    }
}

pub type SeatConfig<M> = UseRightsConfig<SeatDescriptor, SeatPolicy, M>;

/// Seat configuration whose unwrap yields `maker(seat)`.
pub fn seat_config<M: UseObjectMaker<SeatDescriptor>>(maker: M) -> SeatConfig<M> {
    UseRightsConfig::new(SeatPolicy, maker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rights_kernel::{KernelError, Mint};
    use rights_kernel_core::CoreError;

    #[derive(Debug, PartialEq)]
    struct SeatUse {
        seat_id: u64,
        role: String,
    }

    fn mint() -> Mint<SeatConfig<impl UseObjectMaker<SeatDescriptor, UseObj = SeatUse>>> {
        Mint::new(
            seat_config(|seat: SeatDescriptor| SeatUse {
                seat_id: seat.seat_id,
                role: seat.role,
            }),
            "seats",
        )
    }

    #[test]
    fn test_seat_unwrap() {
        let mint = mint();
        let seat = SeatDescriptor::new(1, "buyer").with_term("price", "10");
        let payment = mint.mint(Some(seat), None).unwrap().withdraw_all(None).unwrap();

        let seat_use = payment.ext().unwrap().unwrap();
        assert_eq!(
            seat_use,
            SeatUse {
                seat_id: 1,
                role: "buyer".into()
            }
        );
    }

    #[test]
    fn test_seat_without_role_rejected() {
        let mint = mint();
        let err = mint.mint(Some(SeatDescriptor::new(2, "  ")), None).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Core(CoreError::InvalidExtent { .. })
        ));
    }

    #[test]
    fn test_seats_are_indivisible() {
        let mint = mint();
        let assay = mint.assay();
        let a = mint
            .mint(Some(SeatDescriptor::new(1, "buyer")), None)
            .unwrap()
            .withdraw_all(None)
            .unwrap();
        let b = mint
            .mint(Some(SeatDescriptor::new(2, "seller")), None)
            .unwrap()
            .withdraw_all(None)
            .unwrap();

        let err = assay.combine(&[a.clone(), b.clone()], None).unwrap_err();
        assert!(matches!(err, KernelError::Core(CoreError::Indivisible { .. })));
        assert!(assay.is_live(&a).unwrap());
        assert!(assay.is_live(&b).unwrap());
    }
}
