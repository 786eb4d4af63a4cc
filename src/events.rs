use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate};
use crate::types::{Address, AssetId, ClaimKind, CollateralRef, LoanId, Terms};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanCreated {
        loan_id: LoanId,
        minter: Address,
        collateral: CollateralRef,
        loan_asset: AssetId,
        max_rate: Rate,
        min_principal: Amount,
        min_duration_secs: u32,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        loan_id: LoanId,
        collateral_recipient: Address,
        timestamp: DateTime<Utc>,
    },
    LoanUnderwritten {
        loan_id: LoanId,
        lender: Address,
        terms: Terms,
        borrower_payout: Amount,
        fee: Amount,
        timestamp: DateTime<Utc>,
    },
    LenderBoughtOut {
        loan_id: LoanId,
        new_lender: Address,
        previous_lender: Address,
        terms: Terms,
        interest_paid: Amount,
        principal_repaid: Amount,
        borrower_payout: Amount,
        fee: Amount,
        timestamp: DateTime<Utc>,
    },
    LoanRepaid {
        loan_id: LoanId,
        repayer: Address,
        lender: Address,
        interest: Amount,
        total: Amount,
        timestamp: DateTime<Utc>,
    },
    CollateralSeized {
        loan_id: LoanId,
        lender: Address,
        collateral_recipient: Address,
        timestamp: DateTime<Utc>,
    },

    // administrative events
    RegistryRegistered {
        kind: ClaimKind,
    },
    FeeRateUpdated {
        old_rate: Rate,
        new_rate: Rate,
    },
    ImprovementRateUpdated {
        old_rate: Rate,
        new_rate: Rate,
    },
    FeesWithdrawn {
        asset: AssetId,
        amount: Amount,
        recipient: Address,
    },
}

impl Event {
    /// loan the event refers to, if any
    pub fn loan_id(&self) -> Option<LoanId> {
        match self {
            Event::LoanCreated { loan_id, .. }
            | Event::LoanClosed { loan_id, .. }
            | Event::LoanUnderwritten { loan_id, .. }
            | Event::LenderBoughtOut { loan_id, .. }
            | Event::LoanRepaid { loan_id, .. }
            | Event::CollateralSeized { loan_id, .. } => Some(*loan_id),
            _ => None,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// events recorded for one loan, in emission order
    pub fn for_loan(&self, loan_id: LoanId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.loan_id() == Some(loan_id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
