/// buyout - a second lender refinances a running loan on better terms
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    Address, AssetBook, ClaimKind, CollateralRef, Funding, FundingOffer, InMemoryAssetBook,
    InMemoryClaimRegistry, LedgerConfig, LedgerError, LoanLedger, LoanRequest, Rate, SafeTimeProvider,
    TimeSource,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== lender buyout ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let book = Arc::new(InMemoryAssetBook::new());
    let owner = Address::random();
    let ledger = LoanLedger::new(owner, LedgerConfig::default(), book.clone())?;
    ledger.register_registry(owner, Arc::new(InMemoryClaimRegistry::new(ClaimKind::Borrower, ledger.custody())))?;
    ledger.register_registry(owner, Arc::new(InMemoryClaimRegistry::new(ClaimKind::Lender, ledger.custody())))?;

    let (borrower, alice, bob) = (Address::random(), Address::random(), Address::random());
    let (nft, usdc) = (Address::random(), Address::random());
    book.mint_token(nft, 1, borrower);
    book.mint_fungible(usdc, alice, 1_000_000_000)?;
    book.mint_fungible(usdc, bob, 1_000_000_000)?;

    let loan_id = ledger.create_loan(
        borrower,
        LoanRequest {
            collateral: CollateralRef { asset: nft, token_id: 1 },
            max_rate: Rate::from_percentage(20),
            min_principal: 100_000_000,
            min_duration_secs: 365 * 86_400,
            loan_asset: usdc,
            claim_recipient: borrower,
        },
        &time,
    )?;

    // alice underwrites at 20%
    ledger.fund(
        alice,
        loan_id,
        FundingOffer {
            rate: Rate::from_percentage(20),
            principal: 100_000_000,
            duration_secs: 365 * 86_400,
            claim_recipient: alice,
        },
        &time,
    )?;
    println!("alice funds 100 usdc at 20%");
    println!("  borrower balance: {}", book.balance_of(usdc, borrower));

    controller.advance(Duration::days(73));
    println!("\nafter 73 days alice is owed {} in interest", ledger.interest_owed(loan_id, &time)?);

    // 5% lower is not enough with a 10% improvement margin
    let timid = FundingOffer {
        rate: Rate::from_percentage(19),
        principal: 100_000_000,
        duration_secs: 365 * 86_400,
        claim_recipient: bob,
    };
    match ledger.fund(bob, loan_id, timid, &time) {
        Err(LedgerError::TermsNotImproved) => println!("bob's 19% offer rejected: not a big enough improvement"),
        other => println!("unexpected: {:?}", other),
    }

    // more principal at a lower rate
    let bold = FundingOffer {
        rate: Rate::from_percentage(15),
        principal: 120_000_000,
        duration_secs: 365 * 86_400,
        claim_recipient: bob,
    };
    if let Funding::BoughtOut { previous_lender, settlement } = ledger.fund(bob, loan_id, bold, &time)? {
        println!("\nbob buys out {}", previous_lender);
        println!("  paid to alice: {} (interest {})", settlement.lender_payout, settlement.interest);
        println!("  paid to borrower: {}", settlement.borrower_payout);
        println!("  origination fee: {}", settlement.fee);
    }

    println!("\nalice balance: {}", book.balance_of(usdc, alice));
    println!("bob balance: {}", book.balance_of(usdc, bob));
    println!("lender claim now held by bob: {}", ledger.lender_of(loan_id)? == Some(bob));

    for event in ledger.events_for(loan_id) {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
