#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    Address, Amount, AssetBook, AssetId, ClaimKind, CollateralRef, FundingOffer, InMemoryAssetBook,
    InMemoryClaimRegistry, LedgerConfig, LoanId, LoanLedger, LoanRequest, Rate, SafeTimeProvider,
    TimeSource,
};
use std::sync::Arc;

/// 2024-01-01T00:00:00Z
pub const START: u64 = 1_704_067_200;

pub const FUNDS: Amount = 1_000_000_000_000_000;

pub struct Harness {
    pub ledger: Arc<LoanLedger>,
    pub book: Arc<InMemoryAssetBook>,
    pub borrower_claims: Arc<InMemoryClaimRegistry>,
    pub lender_claims: Arc<InMemoryClaimRegistry>,
    pub owner: Address,
    pub borrower: Address,
    pub lender: Address,
    pub rival: Address,
    pub nft: AssetId,
    pub usd: AssetId,
    pub time: SafeTimeProvider,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let book = Arc::new(InMemoryAssetBook::new());
        let owner = Address::random();
        let ledger = LoanLedger::new(owner, config, book.clone()).unwrap();
        let borrower_claims = Arc::new(InMemoryClaimRegistry::new(ClaimKind::Borrower, ledger.custody()));
        let lender_claims = Arc::new(InMemoryClaimRegistry::new(ClaimKind::Lender, ledger.custody()));
        ledger.register_registry(owner, borrower_claims.clone()).unwrap();
        ledger.register_registry(owner, lender_claims.clone()).unwrap();

        let (borrower, lender, rival) = (Address::random(), Address::random(), Address::random());
        let (nft, usd) = (Address::random(), Address::random());
        book.mint_token(nft, 1, borrower);
        for party in [borrower, lender, rival] {
            book.mint_fungible(usd, party, FUNDS).unwrap();
        }

        Self {
            ledger: Arc::new(ledger),
            book,
            borrower_claims,
            lender_claims,
            owner,
            borrower,
            lender,
            rival,
            nft,
            usd,
            time: SafeTimeProvider::new(TimeSource::Test(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            )),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.time.test_control().unwrap().advance(Duration::seconds(secs));
    }

    pub fn collateral(&self) -> CollateralRef {
        CollateralRef {
            asset: self.nft,
            token_id: 1,
        }
    }

    pub fn request(&self, max_rate: u32, min_principal: Amount, min_duration_secs: u32) -> LoanRequest {
        LoanRequest {
            collateral: self.collateral(),
            max_rate: Rate::from_scaled(max_rate),
            min_principal,
            min_duration_secs,
            loan_asset: self.usd,
            claim_recipient: self.borrower,
        }
    }

    /// open the reference loan: 1.5%, 100 units, 1000 seconds
    pub fn open_loan(&self) -> LoanId {
        self.ledger
            .create_loan(self.borrower, self.request(15, 100, 1_000), &self.time)
            .unwrap()
    }

    pub fn balance(&self, holder: Address) -> Amount {
        self.book.balance_of(self.usd, holder)
    }

    pub fn collateral_owner(&self) -> Option<Address> {
        self.book.token_owner(self.nft, 1)
    }
}

pub fn offer(rate: u32, principal: Amount, duration_secs: u32, claim_recipient: Address) -> FundingOffer {
    FundingOffer {
        rate: Rate::from_scaled(rate),
        principal,
        duration_secs,
        claim_recipient,
    }
}
