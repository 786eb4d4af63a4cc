mod common;

use common::{offer, FUNDS, START};
use chrono::{TimeZone, Utc};
use loan_ledger_rs::{
    Address, AssetBook, AssetId, ClaimKind, ClaimRegistry, CollateralRef, InMemoryAssetBook,
    InMemoryClaimRegistry, LedgerConfig, LedgerError, LoanId, LoanLedger, LoanPhase, LoanRequest, Rate,
    SafeTimeProvider, TimeSource, TransferError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// in-memory registry that can be told to refuse ledger-authorized steps
struct GatedRegistry {
    inner: InMemoryClaimRegistry,
    refuse_mint: AtomicBool,
    refuse_force_transfer: AtomicBool,
}

impl GatedRegistry {
    fn new(kind: ClaimKind, facilitator: Address) -> Self {
        Self {
            inner: InMemoryClaimRegistry::new(kind, facilitator),
            refuse_mint: AtomicBool::new(false),
            refuse_force_transfer: AtomicBool::new(false),
        }
    }

    fn refused(&self, caller: Address) -> TransferError {
        TransferError::NotAuthorized {
            kind: self.inner.kind(),
            caller,
        }
    }
}

impl ClaimRegistry for GatedRegistry {
    fn kind(&self) -> ClaimKind {
        self.inner.kind()
    }

    fn identity(&self) -> Address {
        self.inner.identity()
    }

    fn mint(&self, authority: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError> {
        if self.refuse_mint.load(Ordering::SeqCst) {
            return Err(self.refused(authority));
        }
        self.inner.mint(authority, to, loan_id)
    }

    fn burn(&self, authority: Address, loan_id: LoanId) -> Result<(), TransferError> {
        self.inner.burn(authority, loan_id)
    }

    fn owner_of(&self, loan_id: LoanId) -> Option<Address> {
        self.inner.owner_of(loan_id)
    }

    fn transfer(&self, caller: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError> {
        self.inner.transfer(caller, to, loan_id)
    }

    fn force_transfer(
        &self,
        authority: Address,
        from: Address,
        to: Address,
        loan_id: LoanId,
    ) -> Result<(), TransferError> {
        if self.refuse_force_transfer.load(Ordering::SeqCst) {
            return Err(self.refused(authority));
        }
        self.inner.force_transfer(authority, from, to, loan_id)
    }
}

struct Setup {
    ledger: LoanLedger,
    book: Arc<InMemoryAssetBook>,
    borrower_claims: Arc<GatedRegistry>,
    lender_claims: Arc<GatedRegistry>,
    borrower: Address,
    lender: Address,
    rival: Address,
    nft: AssetId,
    usd: AssetId,
    time: SafeTimeProvider,
}

impl Setup {
    fn new() -> Self {
        let book = Arc::new(InMemoryAssetBook::new());
        let owner = Address::random();
        let ledger = LoanLedger::new(owner, LedgerConfig::default(), book.clone()).unwrap();
        let borrower_claims = Arc::new(GatedRegistry::new(ClaimKind::Borrower, ledger.custody()));
        let lender_claims = Arc::new(GatedRegistry::new(ClaimKind::Lender, ledger.custody()));
        ledger.register_registry(owner, borrower_claims.clone()).unwrap();
        ledger.register_registry(owner, lender_claims.clone()).unwrap();

        let (borrower, lender, rival) = (Address::random(), Address::random(), Address::random());
        let (nft, usd) = (Address::random(), Address::random());
        book.mint_token(nft, 1, borrower);
        for party in [borrower, lender, rival] {
            book.mint_fungible(usd, party, FUNDS).unwrap();
        }

        Self {
            ledger,
            book,
            borrower_claims,
            lender_claims,
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

    fn create(&self) -> Result<LoanId, LedgerError> {
        let request = LoanRequest {
            collateral: CollateralRef {
                asset: self.nft,
                token_id: 1,
            },
            max_rate: Rate::from_scaled(15),
            min_principal: 100,
            min_duration_secs: 1_000,
            loan_asset: self.usd,
            claim_recipient: self.borrower,
        };
        self.ledger.create_loan(self.borrower, request, &self.time)
    }

    fn balance(&self, holder: Address) -> u128 {
        self.book.balance_of(self.usd, holder)
    }
}

#[test]
fn test_refused_borrower_claim_leaves_collateral_with_caller() {
    let s = Setup::new();
    s.borrower_claims.refuse_mint.store(true, Ordering::SeqCst);

    assert!(matches!(
        s.create(),
        Err(LedgerError::TransferRejected(TransferError::NotAuthorized { .. }))
    ));
    assert_eq!(s.book.token_owner(s.nft, 1), Some(s.borrower));
    assert_eq!(s.ledger.loan_count(), 0);
    assert_eq!(s.ledger.loan(1), Err(LedgerError::UnknownLoan { loan_id: 1 }));

    s.borrower_claims.refuse_mint.store(false, Ordering::SeqCst);
    assert_eq!(s.create(), Ok(1));
    assert_eq!(s.book.token_owner(s.nft, 1), Some(s.ledger.custody()));
}

#[test]
fn test_registry_without_ledger_authority_blocks_create() {
    let book = Arc::new(InMemoryAssetBook::new());
    let owner = Address::random();
    let ledger = LoanLedger::new(owner, LedgerConfig::default(), book.clone()).unwrap();
    // minter is someone other than the ledger's custody identity
    let borrower_claims = Arc::new(InMemoryClaimRegistry::new(ClaimKind::Borrower, Address::random()));
    let lender_claims = Arc::new(InMemoryClaimRegistry::new(ClaimKind::Lender, ledger.custody()));
    ledger.register_registry(owner, borrower_claims).unwrap();
    ledger.register_registry(owner, lender_claims).unwrap();

    let (borrower, nft) = (Address::random(), Address::random());
    book.mint_token(nft, 1, borrower);
    let request = LoanRequest {
        collateral: CollateralRef { asset: nft, token_id: 1 },
        max_rate: Rate::from_scaled(15),
        min_principal: 100,
        min_duration_secs: 1_000,
        loan_asset: Address::random(),
        claim_recipient: borrower,
    };
    let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));

    assert!(ledger.create_loan(borrower, request, &time).is_err());
    assert_eq!(book.token_owner(nft, 1), Some(borrower));
    assert_eq!(ledger.loan_count(), 0);
}

#[test]
fn test_refused_lender_claim_moves_no_funds() {
    let s = Setup::new();
    let loan_id = s.create().unwrap();
    s.lender_claims.refuse_mint.store(true, Ordering::SeqCst);

    assert!(matches!(
        s.ledger.fund(s.lender, loan_id, offer(15, 100, 1_000, s.lender), &s.time),
        Err(LedgerError::TransferRejected(TransferError::NotAuthorized { .. }))
    ));
    assert_eq!(s.balance(s.lender), FUNDS);
    assert_eq!(s.balance(s.borrower), FUNDS);
    assert_eq!(s.balance(s.ledger.custody()), 0);
    assert_eq!(s.ledger.accrued_fees(s.usd), 0);
    assert_eq!(s.ledger.lender_of(loan_id).unwrap(), None);
    assert_eq!(s.ledger.loan(loan_id).unwrap().phase, LoanPhase::Proposed);
}

#[test]
fn test_refused_claim_reassignment_moves_no_funds() {
    let s = Setup::new();
    let loan_id = s.create().unwrap();
    s.ledger
        .fund(s.lender, loan_id, offer(15, 100, 1_000, s.lender), &s.time)
        .unwrap();
    s.time.test_control().unwrap().advance(chrono::Duration::seconds(500));
    s.lender_claims.refuse_force_transfer.store(true, Ordering::SeqCst);

    assert!(matches!(
        s.ledger.fund(s.rival, loan_id, offer(15, 120, 1_000, s.rival), &s.time),
        Err(LedgerError::TransferRejected(TransferError::NotAuthorized { .. }))
    ));
    assert_eq!(s.balance(s.rival), FUNDS);
    assert_eq!(s.balance(s.lender), FUNDS - 100);
    assert_eq!(s.balance(s.borrower), FUNDS + 99);
    assert_eq!(s.ledger.lender_of(loan_id).unwrap(), Some(s.lender));

    let loan = s.ledger.loan(loan_id).unwrap();
    assert_eq!(loan.principal(), 100);
    assert_eq!(loan.phase, LoanPhase::Funded { checkpoint: START });

    s.lender_claims.refuse_force_transfer.store(false, Ordering::SeqCst);
    s.ledger
        .fund(s.rival, loan_id, offer(15, 120, 1_000, s.rival), &s.time)
        .unwrap();
    assert_eq!(s.ledger.lender_of(loan_id).unwrap(), Some(s.rival));
    assert_eq!(s.balance(s.rival), FUNDS - 120);
}

#[test]
fn test_rejected_buyout_payment_restores_lender_claim() {
    let s = Setup::new();
    let loan_id = s.create().unwrap();
    s.ledger
        .fund(s.lender, loan_id, offer(15, 100, 1_000, s.lender), &s.time)
        .unwrap();
    let poor = Address::random();
    s.book.mint_fungible(s.usd, poor, 50).unwrap();

    assert!(matches!(
        s.ledger.fund(poor, loan_id, offer(15, 120, 1_000, poor), &s.time),
        Err(LedgerError::TransferRejected(TransferError::InsufficientBalance { .. }))
    ));
    assert_eq!(s.lender_claims.owner_of(loan_id), Some(s.lender));
    assert_eq!(s.balance(poor), 50);
    assert_eq!(s.ledger.loan(loan_id).unwrap().principal(), 100);
}
