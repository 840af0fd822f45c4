//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;

use rights_kernel_configs::Pixel;

/// A fungible amount small enough that sums never overflow.
pub fn amount() -> impl Strategy<Value = u64> {
    0u64..=10_000
}

/// Starting balances for a handful of purses.
pub fn balances(max_purses: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(amount(), 1..=max_purses)
}

/// A mint name.
pub fn mint_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 ]{0,15}".prop_map(String::from)
}

/// A set of distinct pixels on a `width` x `height` canvas.
pub fn pixel_set(width: u32, height: u32, max: usize) -> impl Strategy<Value = Vec<Pixel>> {
    prop::collection::btree_set((0..width, 0..height), 0..=max)
        .prop_map(|cells: BTreeSet<(u32, u32)>| {
            cells.into_iter().map(|(x, y)| Pixel::new(x, y)).collect()
        })
}

/// One step against a Nat mint.
///
/// Indices pick among the handles a [`NatFixture`](crate::NatFixture)
/// has seen so far, modulo their count, so dead payments are chosen as
/// often as live ones.
#[derive(Debug, Clone)]
pub enum LedgerOp {
    Withdraw { purse: usize, amount: u64 },
    Deposit { purse: usize, payment: usize },
    Split { payment: usize, parts: Vec<u64> },
    Combine { payments: Vec<usize> },
    Claim { payment: usize },
    Burn { payment: usize },
}

pub fn ledger_op() -> impl Strategy<Value = LedgerOp> {
    let index = 0usize..64;
    prop_oneof![
        3 => (index.clone(), 0u64..=1_500)
            .prop_map(|(purse, amount)| LedgerOp::Withdraw { purse, amount }),
        2 => (index.clone(), index.clone())
            .prop_map(|(purse, payment)| LedgerOp::Deposit { purse, payment }),
        2 => (index.clone(), prop::collection::vec(0u64..=500, 0..5))
            .prop_map(|(payment, parts)| LedgerOp::Split { payment, parts }),
        1 => prop::collection::vec(index.clone(), 0..4)
            .prop_map(|payments| LedgerOp::Combine { payments }),
        1 => index.clone().prop_map(|payment| LedgerOp::Claim { payment }),
        1 => index.prop_map(|payment| LedgerOp::Burn { payment }),
    ]
}

/// Parameters for a random ledger session.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub balances: Vec<u64>,
    pub ops: Vec<LedgerOp>,
}

impl Arbitrary for SessionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (balances(4), prop::collection::vec(ledger_op(), 1..40))
            .prop_map(|(balances, ops)| SessionParams { balances, ops })
            .boxed()
    }
}
