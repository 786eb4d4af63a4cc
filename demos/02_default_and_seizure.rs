/// default - the lender seizes collateral once the loan is past due
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

    // config can come from the environment, falling back to defaults
    let config = LedgerConfig::from_env().unwrap_or_default();
    println!("ledger config:\n{}\n", config.to_json_pretty());

    let book = Arc::new(InMemoryAssetBook::new());
    let owner = Address::random();
    let ledger = LoanLedger::new(owner, config, book.clone())?;
    ledger.register_registry(owner, Arc::new(InMemoryClaimRegistry::new(ClaimKind::Borrower, ledger.custody())))?;
    ledger.register_registry(owner, Arc::new(InMemoryClaimRegistry::new(ClaimKind::Lender, ledger.custody())))?;

    let (borrower, lender) = (Address::random(), Address::random());
    let (nft, weth) = (Address::random(), Address::random());
    book.mint_token(nft, 42, borrower);
    book.mint_fungible(weth, lender, 5_000_000)?;

    let loan_id = ledger.create_loan(
        borrower,
        LoanRequest {
            collateral: CollateralRef { asset: nft, token_id: 42 },
            max_rate: Rate::from_percentage(30),
            min_principal: 1_000_000,
            min_duration_secs: 30 * 86_400,
            loan_asset: weth,
            claim_recipient: borrower,
        },
        &time,
    )?;
    ledger.fund(
        lender,
        loan_id,
        FundingOffer {
            rate: Rate::from_percentage(25),
            principal: 1_000_000,
            duration_secs: 30 * 86_400,
            claim_recipient: lender,
        },
        &time,
    )?;
    println!("loan due at {:?}", ledger.loan_end(loan_id)?);

    controller.advance(Duration::days(30));
    println!("day 30, seizable: {}", ledger.is_seizable(loan_id, &time)?);
    if let Err(e) = ledger.seize_collateral(lender, loan_id, lender, &time) {
        println!("  seizure refused: {}", e);
    }

    controller.advance(Duration::seconds(1));
    println!("one second later, seizable: {}", ledger.is_seizable(loan_id, &time)?);
    println!("  owed at default: {}", ledger.total_owed(loan_id, &time)?);

    ledger.seize_collateral(lender, loan_id, lender, &time)?;
    println!("collateral now with lender: {}", book.token_owner(nft, 42) == Some(lender));

    // retained origination fees go to the treasury
    let treasury = Address::random();
    let fees = ledger.accrued_fees(weth);
    ledger.withdraw_fees(owner, weth, fees, treasury)?;
    println!("withdrew {} in fees to the treasury", book.balance_of(weth, treasury));

    println!("\n{}", ledger.view(loan_id, &time)?.to_json_pretty()?);

    Ok(())
}
