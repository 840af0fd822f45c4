//! Test fixtures and helpers.
//!
//! Common setup code for integration tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rights_kernel::{Assay, BasicConfig, KernelError, Mint, Payment, Purse};
use rights_kernel_configs::{Pixel, PixelConfig};

use crate::generators::LedgerOp;

/// A Nat mint, its purses, and every payment it has handed out.
///
/// Payments are never dropped from `payments`, so ops can be aimed at
/// consumed handles as well as live ones.
pub struct NatFixture {
    pub mint: Mint<BasicConfig>,
    pub assay: Assay<BasicConfig>,
    pub purses: Vec<Purse<BasicConfig>>,
    pub payments: Vec<Payment<BasicConfig>>,
    minted: u64,
    burned: u64,
}

/// What one [`LedgerOp`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// The op committed. Lists payments it consumed.
    Applied { consumed: Vec<usize> },
    /// The op was rejected and changed nothing.
    Rejected(KernelError),
    /// Nothing to aim at yet.
    Skipped,
}

impl NatFixture {
    /// One purse per balance.
    pub fn new(balances: &[u64]) -> Self {
        let mint = Mint::new(BasicConfig, "fixture bucks");
        let assay = mint.assay();
        let purses = balances
            .iter()
            .map(|&balance| mint.mint(balance, None))
            .collect::<Result<Vec<_>, _>>()
            .expect("minting fixture purses");
        Self {
            mint,
            assay,
            purses,
            payments: Vec::new(),
            minted: balances.iter().sum(),
            burned: 0,
        }
    }

    /// `count` purses with random balances drawn from `seed`.
    pub fn seeded(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let balances: Vec<u64> = (0..count).map(|_| rng.gen_range(1..=1_000)).collect();
        Self::new(&balances)
    }

    /// Units minted minus units burned.
    pub fn expected_outstanding(&self) -> u64 {
        self.minted - self.burned
    }

    /// Balance of every purse, then of every payment (`None` once consumed).
    pub fn snapshot(&self) -> (Vec<u64>, Vec<Option<u64>>) {
        let purses = self
            .purses
            .iter()
            .map(|p| *p.balance().expect("purse balance").extent())
            .collect();
        let payments = self
            .payments
            .iter()
            .map(|p| p.balance().ok().map(|units| *units.extent()))
            .collect();
        (purses, payments)
    }

    pub fn apply(&mut self, op: &LedgerOp) -> OpOutcome {
        let result = match op {
            LedgerOp::Withdraw { purse, amount } => self.withdraw(*purse, *amount),
            LedgerOp::Deposit { purse, payment } => self.deposit(*purse, *payment),
            LedgerOp::Split { payment, parts } => self.split(*payment, parts),
            LedgerOp::Combine { payments } => self.combine(payments),
            LedgerOp::Claim { payment } => self.claim(*payment),
            LedgerOp::Burn { payment } => self.burn(*payment),
        };
        match result {
            Ok(Some(consumed)) => OpOutcome::Applied { consumed },
            Ok(None) => OpOutcome::Skipped,
            Err(err) => OpOutcome::Rejected(err),
        }
    }

    fn pick_payment(&self, index: usize) -> Option<usize> {
        (!self.payments.is_empty()).then(|| index % self.payments.len())
    }

    fn withdraw(&mut self, purse: usize, amount: u64) -> Result<Option<Vec<usize>>, KernelError> {
        let purse = &self.purses[purse % self.purses.len()];
        let payment = purse.withdraw(&self.assay.make_units(amount)?, None)?;
        self.payments.push(payment);
        Ok(Some(Vec::new()))
    }

    fn deposit(&mut self, purse: usize, payment: usize) -> Result<Option<Vec<usize>>, KernelError> {
        let Some(payment) = self.pick_payment(payment) else {
            return Ok(None);
        };
        self.purses[purse % self.purses.len()].deposit_all(&self.payments[payment])?;
        Ok(Some(vec![payment]))
    }

    fn split(&mut self, payment: usize, parts: &[u64]) -> Result<Option<Vec<usize>>, KernelError> {
        let Some(payment) = self.pick_payment(payment) else {
            return Ok(None);
        };
        let amounts = parts
            .iter()
            .map(|&part| self.assay.make_units(part))
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = self.assay.split(&self.payments[payment], &amounts, None)?;
        self.payments.extend(outputs);
        Ok(Some(vec![payment]))
    }

    fn combine(&mut self, picks: &[usize]) -> Result<Option<Vec<usize>>, KernelError> {
        if self.payments.is_empty() {
            return Ok(None);
        }
        let indices: Vec<usize> = picks.iter().map(|i| i % self.payments.len()).collect();
        let sources: Vec<_> = indices.iter().map(|&i| self.payments[i].clone()).collect();
        let combined = self.assay.combine(&sources, None)?;
        self.payments.push(combined);
        Ok(Some(indices))
    }

    fn claim(&mut self, payment: usize) -> Result<Option<Vec<usize>>, KernelError> {
        let Some(payment) = self.pick_payment(payment) else {
            return Ok(None);
        };
        let claimed = self.assay.claim_all(&self.payments[payment], None)?;
        self.payments.push(claimed);
        Ok(Some(vec![payment]))
    }

    fn burn(&mut self, payment: usize) -> Result<Option<Vec<usize>>, KernelError> {
        let Some(payment) = self.pick_payment(payment) else {
            return Ok(None);
        };
        let burned = self.assay.burn_all(&self.payments[payment])?;
        self.burned += *burned.extent();
        Ok(Some(vec![payment]))
    }
}

/// A pixel mint whose canvas is dealt out row by row across purses.
pub struct PixelFixture {
    pub mint: Mint<PixelConfig>,
    pub purses: Vec<Purse<PixelConfig>>,
}

impl PixelFixture {
    /// Pixel `i` (in row order) goes to purse `i % holders`.
    pub fn striped(width: u32, height: u32, holders: usize) -> Self {
        let mint = Mint::new(PixelConfig::new(width, height), "fixture canvas");
        let mut shares: Vec<Vec<Pixel>> = vec![Vec::new(); holders];
        for (i, pixel) in mint.ext().canvas().pixels().into_iter().enumerate() {
            shares[i % holders].push(pixel);
        }
        let purses = shares
            .into_iter()
            .enumerate()
            .map(|(i, share)| mint.mint(share, Some(&format!("holder {i}"))))
            .collect::<Result<Vec<_>, _>>()
            .expect("minting fixture pixels");
        Self { mint, purses }
    }

    /// Every pixel currently held, across all purses.
    pub fn held(&self) -> Vec<Pixel> {
        let mut held: Vec<Pixel> = self
            .purses
            .iter()
            .flat_map(|p| p.balance().expect("purse balance").into_extent())
            .collect();
        held.sort_by_key(|p| (p.y, p.x));
        held
    }
}

/// Nat fixtures with distinct seeds.
pub fn seeded_fixtures(count: usize, purses: usize) -> Vec<NatFixture> {
    (0..count as u64)
        .map(|seed| NatFixture::seeded(seed, purses))
        .collect()
}
