use tracing::debug;

use crate::decimal::{Amount, Rate};
use crate::errors::{LedgerError, Result};
use crate::settlement::TransferBatch;
use crate::types::{Address, AssetId};

/// computed fund flows for one funding, buyout or repayment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub batch: TransferBatch,
    /// total pulled from the paying party
    pub pulled: Amount,
    /// origination fee retained in custody
    pub fee: Amount,
    pub borrower_payout: Amount,
    /// paid to the outgoing (or repaid) lender
    pub lender_payout: Amount,
    /// interest included in `lender_payout`
    pub interest: Amount,
}

/// routes principal, interest and fees between the parties of a loan
#[derive(Debug, Clone, Copy)]
pub struct SettlementEngine {
    pub fee_rate: Rate,
    /// identity holding custody of escrowed funds and collateral
    pub custody: Address,
}

impl SettlementEngine {
    pub fn new(fee_rate: Rate, custody: Address) -> Self {
        Self { fee_rate, custody }
    }

    /// origination fee on newly introduced principal
    pub fn origination_fee(&self, new_principal: Amount) -> Result<Amount> {
        self.fee_rate
            .portion(new_principal)
            .filter(|fee| *fee <= new_principal)
            .ok_or_else(|| LedgerError::overflow("origination fee"))
    }

    /// first funding: all principal is new and carries the fee
    pub fn underwrite(
        &self,
        asset: AssetId,
        lender: Address,
        borrower: Address,
        principal: Amount,
    ) -> Result<Settlement> {
        let fee = self.origination_fee(principal)?;
        let borrower_payout = principal - fee;

        debug!(%lender, %borrower, principal, fee, borrower_payout, "underwriting settlement");

        Ok(Settlement {
            batch: TransferBatch::new()
                .fungible(asset, lender, self.custody, principal)
                .fungible(asset, self.custody, borrower, borrower_payout),
            pulled: principal,
            fee,
            borrower_payout,
            lender_payout: 0,
            interest: 0,
        })
    }

    /// refinance: outgoing lender is made whole, only the increment is new
    pub fn buyout(
        &self,
        asset: AssetId,
        new_lender: Address,
        previous_lender: Address,
        borrower: Address,
        previous_principal: Amount,
        principal_increase: Amount,
        interest: Amount,
    ) -> Result<Settlement> {
        let lender_payout = interest
            .checked_add(previous_principal)
            .ok_or_else(|| LedgerError::overflow("buyout payout"))?;

        let settlement = if principal_increase > 0 {
            let pulled = lender_payout
                .checked_add(principal_increase)
                .ok_or_else(|| LedgerError::overflow("buyout amount"))?;
            let fee = self.origination_fee(principal_increase)?;
            let borrower_payout = principal_increase - fee;

            Settlement {
                batch: TransferBatch::new()
                    .fungible(asset, new_lender, self.custody, pulled)
                    .fungible(asset, self.custody, previous_lender, lender_payout)
                    .fungible(asset, self.custody, borrower, borrower_payout),
                pulled,
                fee,
                borrower_payout,
                lender_payout,
                interest,
            }
        } else {
            // nothing new introduced: no fee, no borrower payout
            Settlement {
                batch: TransferBatch::new().fungible(asset, new_lender, previous_lender, lender_payout),
                pulled: lender_payout,
                fee: 0,
                borrower_payout: 0,
                lender_payout,
                interest,
            }
        };

        debug!(
            %new_lender,
            %previous_lender,
            pulled = settlement.pulled,
            fee = settlement.fee,
            borrower_payout = settlement.borrower_payout,
            lender_payout = settlement.lender_payout,
            "buyout settlement"
        );

        Ok(settlement)
    }

    /// repayment: principal plus interest straight to the lender
    pub fn repay(
        &self,
        asset: AssetId,
        payer: Address,
        lender: Address,
        principal: Amount,
        interest: Amount,
    ) -> Result<Settlement> {
        let total = principal
            .checked_add(interest)
            .ok_or_else(|| LedgerError::overflow("repayment amount"))?;

        debug!(%payer, %lender, principal, interest, total, "repayment settlement");

        Ok(Settlement {
            batch: TransferBatch::new().fungible(asset, payer, lender, total),
            pulled: total,
            fee: 0,
            borrower_payout: 0,
            lender_payout: total,
            interest,
        })
    }
}
