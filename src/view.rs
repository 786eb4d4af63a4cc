/// serialization support for loans
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate};
use crate::state::Loan;
use crate::types::{AssetId, CollateralRef, LoanId};

/// serializable view of a loan record with live figures
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub phase: String,
    pub closed: bool,
    pub collateral: CollateralRef,
    pub loan_asset: AssetId,
    pub terms: TermsView,
    pub accrual: AccrualView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub rate: Rate,
    pub rate_percent: String,
    pub duration_secs: u32,
    pub principal: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccrualView {
    pub last_checkpoint: Option<DateTime<Utc>>,
    pub loan_end: Option<DateTime<Utc>>,
    pub accumulated_interest: Amount,
    pub interest_owed: Amount,
    pub total_owed: Amount,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, interest_owed: Amount, total_owed: Amount) -> Self {
        LoanView {
            id: loan.id,
            phase: loan.phase.to_string(),
            closed: loan.is_closed(),
            collateral: loan.collateral,
            loan_asset: loan.loan_asset,
            terms: TermsView {
                rate: loan.terms.rate,
                rate_percent: loan.terms.rate.to_string(),
                duration_secs: loan.terms.duration_secs,
                principal: loan.terms.principal,
            },
            accrual: AccrualView {
                last_checkpoint: loan.last_checkpoint().and_then(to_datetime),
                loan_end: loan.end_seconds().and_then(to_datetime),
                accumulated_interest: loan.accumulated_interest,
                interest_owed,
                total_owed,
            },
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn to_datetime(secs: u64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Terms};

    #[test]
    fn test_view_of_funded_loan() {
        let mut loan = Loan::propose(
            3,
            Terms::new(Rate::from_scaled(15), 1_000, 100),
            CollateralRef {
                asset: Address::random(),
                token_id: 1,
            },
            Address::random(),
        );
        loan.fund(loan.terms, 0, 1_704_067_200);

        let view = LoanView::from_loan(&loan, 2, 102);
        assert_eq!(view.phase, "funded");
        assert!(!view.closed);
        assert_eq!(view.terms.rate_percent, "1.5%");
        assert_eq!(
            view.accrual.loan_end,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 16, 40).unwrap())
        );

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"total_owed\": 102"));
    }
}
