//! Ledger planning and commit.
//!
//! Every kernel operation runs in two steps under one write guard:
//!
//! 1. A `plan_*` method reads the ledger, performs every fallible check and
//!    returns a [`CommitPlan`] describing the writes.
//! 2. [`Ledger::commit`] applies the plan.
//!
//! `CommitPlan` has no public constructor, so a mutation cannot be issued
//! without going through validation first. Once `commit` starts, a failure
//! means the ledger can no longer be trusted: the mint is marked suspect and
//! refuses all further work.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use tracing::{error, trace};

use rights_kernel_core::{ElementwiseOps, ExtentOps, Label, UnitOps, Units};
use rights_kernel_keeper::{
    Holder, KeeperError, MintKeeper, PaymentId, PurseId, RevocableKeeper,
};

use crate::error::{KernelError, Result};

/// One ledger write.
enum Mutation<O: ExtentOps> {
    Record(Holder, Units<O>),
    Update(Holder, Units<O>),
    Remove(Holder),
}

/// Validated ledger writes for one operation.
///
/// Writes are applied in order: records, then updates, then removals. The
/// revocable keeper relies on this so that an element moving between handles
/// is indexed under its new holder before the old holder lets go of it.
pub(crate) struct CommitPlan<O: ExtentOps> {
    op: &'static str,
    records: Vec<(Holder, Units<O>)>,
    updates: Vec<(Holder, Units<O>)>,
    removals: Vec<Holder>,
    fresh_ids: u64,
}

impl<O: ExtentOps> CommitPlan<O> {
    fn new(op: &'static str) -> Self {
        Self {
            op,
            records: Vec::new(),
            updates: Vec::new(),
            removals: Vec::new(),
            fresh_ids: 0,
        }
    }

    fn record(&mut self, holder: Holder, units: Units<O>) {
        self.records.push((holder, units));
    }

    fn update(&mut self, holder: Holder, units: Units<O>) {
        self.updates.push((holder, units));
    }

    fn remove(&mut self, holder: Holder) {
        self.removals.push(holder);
    }

    fn into_mutations(self) -> impl Iterator<Item = Mutation<O>> {
        self.records
            .into_iter()
            .map(|(h, u)| Mutation::Record(h, u))
            .chain(self.updates.into_iter().map(|(h, u)| Mutation::Update(h, u)))
            .chain(self.removals.into_iter().map(Mutation::Remove))
    }

    fn len(&self) -> usize {
        self.records.len() + self.updates.len() + self.removals.len()
    }
}

/// The mutable state of one mint: its keeper, its id counter and its health.
pub(crate) struct Ledger<O: ExtentOps, K: MintKeeper<O>> {
    keeper: K,
    next_id: u64,
    suspect: bool,
    _ops: PhantomData<fn() -> O>,
}

impl<O: ExtentOps, K: MintKeeper<O>> Ledger<O, K> {
    pub fn new(keeper: K) -> Self {
        Self {
            keeper,
            next_id: 0,
            suspect: false,
            _ops: PhantomData,
        }
    }

    pub fn keeper(&self) -> &K {
        &self.keeper
    }

    pub fn ensure_sound(&self, label: &Label) -> Result<()> {
        if self.suspect {
            return Err(KernelError::MintSuspect(label.to_string()));
        }
        Ok(())
    }

    pub fn balance(&self, holder: Holder) -> Result<Units<O>> {
        Ok(self.keeper.get_units(holder)?.clone())
    }

    /// Id `n` of the ids the pending plan will consume. Ids come from one
    /// counter shared by purses and payments and are never handed out twice.
    fn fresh_id(&self, plan: &mut CommitPlan<O>) -> u64 {
        let id = self.next_id + plan.fresh_ids;
        plan.fresh_ids += 1;
        id
    }

    fn payment_balance(&self, payment: PaymentId) -> Result<Units<O>> {
        self.balance(Holder::Payment(payment))
    }

    fn insist_balance(
        unit_ops: &UnitOps<O>,
        balance: &Units<O>,
        expected: Option<&Units<O>>,
    ) -> Result<()> {
        if let Some(expected) = expected {
            if !unit_ops.equals(balance, expected)? {
                return Err(KernelError::BalanceMismatch {
                    balance: format!("{:?}", balance.extent()),
                    units: format!("{:?}", expected.extent()),
                });
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Planning
    // ─────────────────────────────────────────────────────────────────────────

    /// A new purse holding `units`.
    pub fn plan_purse(&self, unit_ops: &UnitOps<O>, units: &Units<O>) -> Result<(CommitPlan<O>, PurseId)> {
        let units = unit_ops.coerce(units)?;
        self.keeper.insist_fresh(&units)?;
        let mut plan = CommitPlan::new("make_purse");
        let purse = PurseId(self.fresh_id(&mut plan));
        plan.record(purse.into(), units);
        Ok((plan, purse))
    }

    /// Move `amount` (or everything, when `None`) out of a purse into a new
    /// payment.
    pub fn plan_withdraw(
        &self,
        unit_ops: &UnitOps<O>,
        purse: PurseId,
        amount: Option<&Units<O>>,
    ) -> Result<(CommitPlan<O>, PaymentId, Units<O>)> {
        let balance = self.balance(purse.into())?;
        let amount = match amount {
            Some(amount) => unit_ops.coerce(amount)?,
            None => balance.clone(),
        };
        let remaining = unit_ops.without(&balance, &amount)?;

        let mut plan = CommitPlan::new("withdraw");
        let payment = PaymentId(self.fresh_id(&mut plan));
        plan.record(payment.into(), amount.clone());
        plan.update(purse.into(), remaining);
        Ok((plan, payment, amount))
    }

    /// Fold a payment into a purse.
    pub fn plan_deposit(
        &self,
        unit_ops: &UnitOps<O>,
        purse: PurseId,
        payment: PaymentId,
        expected: Option<&Units<O>>,
    ) -> Result<(CommitPlan<O>, Units<O>)> {
        let incoming = self.payment_balance(payment)?;
        Self::insist_balance(unit_ops, &incoming, expected)?;
        let current = self.balance(purse.into())?;
        let combined = unit_ops.with(&current, &incoming)?;

        let mut plan = CommitPlan::new("deposit");
        plan.update(purse.into(), combined);
        plan.remove(payment.into());
        Ok((plan, incoming))
    }

    /// Break one payment into payments of exactly `amounts`.
    pub fn plan_split(
        &self,
        unit_ops: &UnitOps<O>,
        payment: PaymentId,
        amounts: &[Units<O>],
    ) -> Result<(CommitPlan<O>, Vec<(PaymentId, Units<O>)>)> {
        let mut remaining = self.payment_balance(payment)?;
        let mut parts = Vec::with_capacity(amounts.len());
        for amount in amounts {
            let amount = unit_ops.coerce(amount)?;
            remaining = unit_ops.without(&remaining, &amount).map_err(|_| {
                KernelError::SplitCoverage(format!("amounts exceed the balance of {payment}"))
            })?;
            parts.push(amount);
        }
        if !unit_ops.is_empty(&remaining)? {
            return Err(KernelError::SplitCoverage(format!(
                "{:?} of {payment} left uncovered",
                remaining.extent()
            )));
        }

        let mut plan = CommitPlan::new("split");
        let mut outputs = Vec::with_capacity(parts.len());
        for units in parts {
            let id = PaymentId(self.fresh_id(&mut plan));
            plan.record(id.into(), units.clone());
            outputs.push((id, units));
        }
        plan.remove(payment.into());
        Ok((plan, outputs))
    }

    /// Merge payments into a single new one.
    pub fn plan_combine(
        &self,
        unit_ops: &UnitOps<O>,
        payments: &[PaymentId],
    ) -> Result<(CommitPlan<O>, PaymentId, Units<O>)> {
        let mut seen = BTreeSet::new();
        let mut total = unit_ops.empty();
        for &payment in payments {
            if !seen.insert(payment) {
                return Err(KernelError::DuplicatePayment(payment));
            }
            total = unit_ops.with(&total, &self.payment_balance(payment)?)?;
        }

        let mut plan = CommitPlan::new("combine");
        let combined = PaymentId(self.fresh_id(&mut plan));
        plan.record(combined.into(), total.clone());
        for &payment in payments {
            plan.remove(payment.into());
        }
        Ok((plan, combined, total))
    }

    /// Same units, new payment identity.
    pub fn plan_claim(
        &self,
        unit_ops: &UnitOps<O>,
        payment: PaymentId,
        expected: Option<&Units<O>>,
    ) -> Result<(CommitPlan<O>, PaymentId, Units<O>)> {
        let balance = self.payment_balance(payment)?;
        Self::insist_balance(unit_ops, &balance, expected)?;

        let mut plan = CommitPlan::new("claim");
        let claimed = PaymentId(self.fresh_id(&mut plan));
        plan.record(claimed.into(), balance.clone());
        plan.remove(payment.into());
        Ok((plan, claimed, balance))
    }

    /// Take a payment out of circulation.
    pub fn plan_burn(
        &self,
        unit_ops: &UnitOps<O>,
        payment: PaymentId,
        expected: Option<&Units<O>>,
    ) -> Result<(CommitPlan<O>, Units<O>)> {
        let balance = self.payment_balance(payment)?;
        Self::insist_balance(unit_ops, &balance, expected)?;

        let mut plan = CommitPlan::new("burn");
        plan.remove(payment.into());
        Ok((plan, balance))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commit
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a validated plan. Cannot fail unless the ledger is corrupt.
    pub fn commit(&mut self, plan: CommitPlan<O>) -> Result<()> {
        let op = plan.op;
        let writes = plan.len();
        self.next_id += plan.fresh_ids;

        for mutation in plan.into_mutations() {
            let applied = match mutation {
                Mutation::Record(holder, units) => self.keeper.record_new(holder, units),
                Mutation::Update(holder, units) => self.keeper.update_units(holder, units),
                Mutation::Remove(holder) => self.keeper.remove(holder).map(|_| ()),
            };
            if let Err(e) = applied {
                return Err(self.violation(op, e));
            }
        }

        trace!(op, writes, "committed");
        Ok(())
    }

    fn violation(&mut self, op: &'static str, cause: KeeperError) -> KernelError {
        self.suspect = true;
        error!(op, error = %cause, "ledger write failed after validation");
        KernelError::CommitPointViolation {
            op,
            reason: cause.to_string(),
        }
    }
}

impl<O, K> Ledger<O, K>
where
    O: ElementwiseOps,
    K: RevocableKeeper<O>,
{
    /// Revoke `target` wherever it lives.
    ///
    /// The keeper validates the whole target and computes every new balance
    /// before writing, so errors it reports up to that point leave the
    /// ledger untouched.
    pub fn destroy(&mut self, target: &Units<O>) -> Result<Units<O>> {
        match self.keeper.destroy(target) {
            Ok(destroyed) => Ok(destroyed),
            Err(e @ (KeeperError::Core(_) | KeeperError::Encoding(_))) => Err(e.into()),
            Err(e) => Err(self.violation("destroy", e)),
        }
    }

    pub fn holder_of(&self, element: &O::Element) -> Result<Option<Holder>> {
        Ok(self.keeper.holder_of(element)?)
    }
}
