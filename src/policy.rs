//! Buyout admission: proposed terms must not regress on any dimension and
//! must beat the current terms by the improvement margin on at least one.

use primitive_types::U256;

use crate::decimal::{Amount, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{Term, Terms};

/// which dimensions cleared the improvement margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Improvement {
    pub principal: bool,
    pub duration: bool,
    pub rate: bool,
}

impl Improvement {
    pub fn any(&self) -> bool {
        self.principal || self.duration || self.rate
    }
}

/// admitted buyout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// principal introduced on top of the refinanced principal
    pub principal_increase: Amount,
    pub improvement: Improvement,
}

#[derive(Debug, Clone, Copy)]
pub struct ImprovementPolicy {
    pub improvement_rate: Rate,
}

impl ImprovementPolicy {
    pub fn new(improvement_rate: Rate) -> Self {
        Self { improvement_rate }
    }

    /// ceiling/floor checks used when a proposed loan is first funded
    pub fn check_underwriting(bounds: &Terms, proposed: &Terms) -> Result<()> {
        if proposed.rate > bounds.rate {
            return Err(regressed(Term::Rate, bounds.rate.scaled(), proposed.rate.scaled()));
        }
        if proposed.duration_secs < bounds.duration_secs {
            return Err(regressed(Term::Duration, bounds.duration_secs, proposed.duration_secs));
        }
        if proposed.principal < bounds.principal {
            return Err(LedgerError::TermsRegressed {
                term: Term::Principal,
                current: bounds.principal,
                proposed: proposed.principal,
            });
        }
        Ok(())
    }

    /// decide whether `proposed` may displace the lender holding `current`
    pub fn admit(&self, current: &Terms, proposed: &Terms) -> Result<Admission> {
        if proposed.rate > current.rate {
            return Err(regressed(Term::Rate, current.rate.scaled(), proposed.rate.scaled()));
        }
        if proposed.duration_secs < current.duration_secs {
            return Err(regressed(Term::Duration, current.duration_secs, proposed.duration_secs));
        }
        let principal_increase = proposed
            .principal
            .checked_sub(current.principal)
            .ok_or_else(|| LedgerError::underflow("principal increase"))?;

        let improvement = self.improvement(current, proposed, principal_increase);
        if !improvement.any() {
            return Err(LedgerError::TermsNotImproved);
        }

        Ok(Admission {
            principal_increase,
            improvement,
        })
    }

    fn improvement(&self, current: &Terms, proposed: &Terms, principal_increase: Amount) -> Improvement {
        let margin = self.improvement_rate;

        let principal = margin.portion_wide(current.principal) <= U256::from(principal_increase);

        let duration0 = u128::from(current.duration_secs);
        let duration = U256::from(proposed.duration_secs)
            >= U256::from(duration0) + margin.portion_wide(duration0);

        // once the rate is zero there is nothing left to improve; a margin of
        // 100% or more makes zero the only qualifying rate
        let rate = !current.rate.is_zero() && {
            let rate0 = U256::from(current.rate.scaled());
            let cut = margin.portion_wide(u128::from(current.rate.scaled()));
            let target = if cut >= rate0 { U256::zero() } else { rate0 - cut };
            U256::from(proposed.rate.scaled()) <= target
        };

        Improvement {
            principal,
            duration,
            rate,
        }
    }
}

fn regressed(term: Term, current: u32, proposed: u32) -> LedgerError {
    LedgerError::TermsRegressed {
        term,
        current: current.into(),
        proposed: proposed.into(),
    }
}
