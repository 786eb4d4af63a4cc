mod common;

use chrono::{TimeZone, Utc};
use common::{offer, Harness, FUNDS};
use loan_ledger_rs::{Address, AssetBook, CollateralRef, LedgerError, SafeTimeProvider, TimeSource};
use std::thread;

fn clock_at(offset_secs: i64) -> SafeTimeProvider {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    SafeTimeProvider::new(TimeSource::Test(start + chrono::Duration::seconds(offset_secs)))
}

#[test]
fn test_competing_buyouts_are_serialized() {
    let h = Harness::new();
    let loan_id = h.open_loan();
    h.ledger
        .fund(h.lender, loan_id, offer(15, 100, 1_000, h.lender), &h.time)
        .unwrap();

    let challenger = Address::random();
    h.book.mint_fungible(h.usd, challenger, FUNDS).unwrap();
    let bidders = [h.rival, challenger];

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = bidders
            .iter()
            .map(|&bidder| {
                let ledger = &h.ledger;
                s.spawn(move || {
                    let time = clock_at(500);
                    ledger.fund(bidder, loan_id, offer(15, 120, 1_000, bidder), &time)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    let winners: Vec<_> = bidders
        .iter()
        .zip(&results)
        .filter(|(_, result)| result.is_ok())
        .map(|(bidder, _)| *bidder)
        .collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .any(|result| *result == Err(LedgerError::TermsNotImproved)));

    let winner = winners[0];
    assert_eq!(h.ledger.lender_of(loan_id).unwrap(), Some(winner));
    assert_eq!(h.ledger.loan(loan_id).unwrap().principal(), 120);
    assert_eq!(h.balance(winner), FUNDS - 120);
    // the borrower is paid the increment exactly once
    assert_eq!(h.balance(h.borrower), FUNDS + 99 + 20);
}

#[test]
fn test_parallel_creation_allocates_unique_ids() {
    let h = Harness::new();
    let requests: Vec<_> = (10u128..18)
        .map(|token_id| {
            let borrower = Address::random();
            h.book.mint_token(h.nft, token_id, borrower);
            let mut request = h.request(15, 100, 1_000);
            request.collateral = CollateralRef {
                asset: h.nft,
                token_id,
            };
            request.claim_recipient = borrower;
            (borrower, request)
        })
        .collect();

    let mut ids: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = requests
            .iter()
            .map(|&(borrower, request)| {
                let ledger = &h.ledger;
                s.spawn(move || ledger.create_loan(borrower, request, &clock_at(0)).unwrap())
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
    assert_eq!(h.ledger.loan_count(), 8);

    for loan_id in ids {
        let loan = h.ledger.loan(loan_id).unwrap();
        let (borrower, _) = requests
            .iter()
            .find(|(_, request)| request.collateral == loan.collateral)
            .unwrap();
        assert_eq!(h.ledger.borrower_of(loan_id).unwrap(), Some(*borrower));
        assert_eq!(h.book.token_owner(h.nft, loan.collateral.token_id), Some(h.ledger.custody()));
    }
}
