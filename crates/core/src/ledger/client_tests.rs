//! Tests for the paginated history search.

use rust_decimal_macros::dec;

use eusko_shared::types::{AccountId, PaymentTypeId, StatusId};

use crate::ledger::{Direction, HistoryQuery, search_history};
use crate::testing::{InMemoryLedger, LedgerCall, posting};

fn account() -> AccountId {
    AccountId::new("compte_de_transit")
}

fn ledger_with(count: usize) -> InMemoryLedger {
    let payment_type = PaymentTypeId::new("depot_de_billets");
    (0..count).fold(InMemoryLedger::new(), |ledger, i| {
        ledger.with_history(&account(), posting(&i.to_string(), &payment_type, dec!(10)))
    })
}

fn search_calls(ledger: &InMemoryLedger) -> usize {
    ledger
        .calls()
        .iter()
        .filter(|call| matches!(call, LedgerCall::SearchHistory(_)))
        .count()
}

#[tokio::test]
async fn test_search_flattens_every_page() {
    let ledger = ledger_with(7).page_size(3);
    let postings = search_history(&ledger, &HistoryQuery::account(account()))
        .await
        .unwrap();

    assert_eq!(postings.len(), 7);
    assert_eq!(search_calls(&ledger), 3);
}

#[tokio::test]
async fn test_search_stops_on_exact_page_boundary() {
    let ledger = ledger_with(6).page_size(3);
    let postings = search_history(&ledger, &HistoryQuery::account(account()))
        .await
        .unwrap();

    assert_eq!(postings.len(), 6);
    assert_eq!(search_calls(&ledger), 2);
}

#[tokio::test]
async fn test_empty_history_is_one_call() {
    let ledger = InMemoryLedger::new();
    let postings = search_history(&ledger, &HistoryQuery::account(account()))
        .await
        .unwrap();

    assert!(postings.is_empty());
    assert_eq!(search_calls(&ledger), 1);
}

#[tokio::test]
async fn test_search_applies_filters() {
    let payment_type = PaymentTypeId::new("retrait_de_billets");
    let mut pending = posting("1", &payment_type, dec!(-5));
    pending.statuses.push(StatusId::new("a_rapprocher"));
    let ledger = InMemoryLedger::new()
        .with_history(&account(), pending)
        .with_history(&account(), posting("2", &payment_type, dec!(-5)))
        .with_history(&account(), posting("3", &payment_type, dec!(5)));

    let query = HistoryQuery::account(account())
        .direction(Direction::Debit)
        .status(StatusId::new("a_rapprocher"));
    let postings = search_history(&ledger, &query).await.unwrap();

    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].id.as_str(), "1");
}

#[tokio::test]
async fn test_search_propagates_ledger_failure() {
    let ledger = InMemoryLedger::new().unreachable();
    let err = search_history(&ledger, &HistoryQuery::account(account()))
        .await
        .unwrap_err();
    assert_eq!(err.call, "account/searchAccountHistory");
}
