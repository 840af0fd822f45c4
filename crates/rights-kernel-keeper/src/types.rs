//! Handle identifiers for the ledger.
//!
//! Purses and payments are lightweight handles; their balances live in the
//! keeper, keyed by these ids.

use std::fmt;

/// Identity of a purse within one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PurseId(pub u64);

/// Identity of a payment within one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaymentId(pub u64);

/// Any ledger key: the holder of some units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Holder {
    Purse(PurseId),
    Payment(PaymentId),
}

impl Holder {
    pub fn is_payment(&self) -> bool {
        matches!(self, Holder::Payment(_))
    }
}

impl From<PurseId> for Holder {
    fn from(id: PurseId) -> Self {
        Holder::Purse(id)
    }
}

impl From<PaymentId> for Holder {
    fn from(id: PaymentId) -> Self {
        Holder::Payment(id)
    }
}

impl fmt::Display for PurseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "purse#{}", self.0)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payment#{}", self.0)
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Purse(id) => id.fmt(f),
            Holder::Payment(id) => id.fmt(f),
        }
    }
}
