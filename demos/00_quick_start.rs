/// quick start - open, fund and repay a single loan
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    Address, AssetBook, ClaimKind, CollateralRef, FundingOffer, InMemoryAssetBook, InMemoryClaimRegistry,
    LedgerConfig, LoanLedger, LoanRequest, Rate, SafeTimeProvider, TimeSource,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    // wire a ledger to an in-memory asset book
    let book = Arc::new(InMemoryAssetBook::new());
    let owner = Address::random();
    let ledger = LoanLedger::new(owner, LedgerConfig::default(), book.clone())?;
    ledger.register_registry(owner, Arc::new(InMemoryClaimRegistry::new(ClaimKind::Borrower, ledger.custody())))?;
    ledger.register_registry(owner, Arc::new(InMemoryClaimRegistry::new(ClaimKind::Lender, ledger.custody())))?;

    let (borrower, lender) = (Address::random(), Address::random());
    let (punks, usdc) = (Address::random(), Address::random());
    book.mint_token(punks, 7_804, borrower);
    book.mint_fungible(usdc, lender, 50_000_000_000)?;
    book.mint_fungible(usdc, borrower, 10_000_000_000)?;

    // borrower asks for at least 10,000 usdc at no more than 12% for 90 days
    let loan_id = ledger.create_loan(
        borrower,
        LoanRequest {
            collateral: CollateralRef { asset: punks, token_id: 7_804 },
            max_rate: Rate::from_percentage(12),
            min_principal: 10_000_000_000,
            min_duration_secs: 90 * 86_400,
            loan_asset: usdc,
            claim_recipient: borrower,
        },
        &time,
    )?;

    ledger.fund(
        lender,
        loan_id,
        FundingOffer {
            rate: Rate::from_percentage(10),
            principal: 10_000_000_000,
            duration_secs: 90 * 86_400,
            claim_recipient: lender,
        },
        &time,
    )?;

    controller.advance(Duration::days(30));
    println!("interest after 30 days: {}", ledger.interest_owed(loan_id, &time)?);

    let settlement = ledger.repay_and_close(borrower, loan_id, &time)?;
    println!("repaid {} to the lender", settlement.pulled);
    println!("collateral back with borrower: {}", book.token_owner(punks, 7_804) == Some(borrower));

    println!("{}", ledger.view(loan_id, &time)?.to_json_pretty()?);

    Ok(())
}
