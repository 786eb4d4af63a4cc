use primitive_types::U256;

use crate::decimal::{to_u128, Amount, Rate, SCALAR, SECONDS_PER_YEAR};
use crate::errors::{LedgerError, Result};
use crate::state::Loan;

/// simple per-second interest on a 365 day year, rounded down
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub year_seconds: u64,
}

impl Default for AccrualEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AccrualEngine {
    pub fn new() -> Self {
        Self {
            year_seconds: SECONDS_PER_YEAR,
        }
    }

    /// `principal × elapsed × rate / (SCALAR × year)` in 256-bit precision
    pub fn simple_interest(&self, principal: Amount, rate: Rate, elapsed_secs: u64) -> U256 {
        let numerator = U256::from(principal) * U256::from(elapsed_secs) * U256::from(rate.scaled());
        let denominator = U256::from(SCALAR) * U256::from(self.year_seconds);
        numerator / denominator
    }

    /// interest owed at `now` for a position checkpointed at `checkpoint`
    pub fn accrue(
        &self,
        principal: Amount,
        checkpoint: u64,
        rate: Rate,
        accumulated_interest: Amount,
        now: u64,
    ) -> InterestAccrual {
        // the clock never runs behind a checkpoint it produced
        let elapsed_secs = now.saturating_sub(checkpoint);
        let accrued = self.simple_interest(principal, rate, elapsed_secs);

        InterestAccrual {
            elapsed_secs,
            accrued,
            carried: accumulated_interest,
            total: accrued + U256::from(accumulated_interest),
        }
    }

    /// interest owed on an open funded loan, `None` otherwise
    pub fn accrue_loan(&self, loan: &Loan, now: u64) -> Option<InterestAccrual> {
        loan.checkpoint().map(|checkpoint| {
            self.accrue(
                loan.principal(),
                checkpoint,
                loan.rate(),
                loan.accumulated_interest,
                now,
            )
        })
    }
}

/// interest accrual result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestAccrual {
    pub elapsed_secs: u64,
    /// interest since the checkpoint
    pub accrued: U256,
    /// interest carried from earlier checkpoints
    pub carried: Amount,
    pub total: U256,
}

impl InterestAccrual {
    /// total narrowed to storage width
    pub fn checked_total(&self) -> Result<Amount> {
        to_u128(self.total).ok_or_else(|| LedgerError::overflow("accumulated interest"))
    }
}
