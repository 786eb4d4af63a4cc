use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Amount, Rate};
use crate::types::{AssetId, CollateralRef, LoanId, Terms};

/// lifecycle phase of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanPhase {
    /// created, waiting for a first lender
    Proposed,
    /// funded; interest accrues from `checkpoint` (unix seconds)
    Funded { checkpoint: u64 },
    /// terminal; keeps the last checkpoint if the loan was ever funded
    Closed { last_checkpoint: Option<u64> },
}

impl LoanPhase {
    pub fn name(&self) -> &'static str {
        match self {
            LoanPhase::Proposed => "proposed",
            LoanPhase::Funded { .. } => "funded",
            LoanPhase::Closed { .. } => "closed",
        }
    }
}

impl fmt::Display for LoanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// loan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub phase: LoanPhase,
    pub terms: Terms,
    pub collateral: CollateralRef,
    pub loan_asset: AssetId,
    /// interest settled at prior checkpoints and carried forward
    pub accumulated_interest: Amount,
}

impl Loan {
    /// new loan in the proposed phase, bounds stored as the current terms
    pub fn propose(id: LoanId, terms: Terms, collateral: CollateralRef, loan_asset: AssetId) -> Self {
        Self {
            id,
            phase: LoanPhase::Proposed,
            terms,
            collateral,
            loan_asset,
            accumulated_interest: 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, LoanPhase::Closed { .. })
    }

    pub fn is_funded(&self) -> bool {
        matches!(self.phase, LoanPhase::Funded { .. })
    }

    /// checkpoint of an open, funded loan
    pub fn checkpoint(&self) -> Option<u64> {
        match self.phase {
            LoanPhase::Funded { checkpoint } => Some(checkpoint),
            _ => None,
        }
    }

    /// last checkpoint, kept after close
    pub fn last_checkpoint(&self) -> Option<u64> {
        match self.phase {
            LoanPhase::Proposed => None,
            LoanPhase::Funded { checkpoint } => Some(checkpoint),
            LoanPhase::Closed { last_checkpoint } => last_checkpoint,
        }
    }

    /// expiry implied by the last accepted terms
    pub fn end_seconds(&self) -> Option<u64> {
        self.last_checkpoint()
            .map(|checkpoint| checkpoint.saturating_add(u64::from(self.terms.duration_secs)))
    }

    pub fn rate(&self) -> Rate {
        self.terms.rate
    }

    pub fn principal(&self) -> Amount {
        self.terms.principal
    }

    /// accept funding terms and start accruing from `now`
    pub(crate) fn fund(&mut self, terms: Terms, accumulated_interest: Amount, now: u64) {
        self.terms = terms;
        self.accumulated_interest = accumulated_interest;
        self.phase = LoanPhase::Funded { checkpoint: now };
    }

    /// permanently close, keeping the checkpoint for history
    pub(crate) fn close(&mut self) {
        if !self.is_closed() {
            self.phase = LoanPhase::Closed {
                last_checkpoint: self.last_checkpoint(),
            };
        }
    }
}
