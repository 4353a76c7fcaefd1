//! Ledger behaviour when the underlying store fails part-way through a call.
//!
//! Failures are injected with [`FailingStore`]; the wrapped [`MemoryStore`]
//! is inspected afterwards to check what was and was not written.

#![allow(clippy::unwrap_used)]

use custody_ledger::{Asset, AssetLedger, LedgerError, Operation};
use custody_storage::{
    MemoryStore, StateStore, StorageError,
    testutil::{FailingStore, FailureTrigger, StoreOp},
};
use rstest::rstest;

fn failing(op: StoreOp, trigger: FailureTrigger) -> (MemoryStore, AssetLedger<FailingStore>) {
    let memory = MemoryStore::new();
    let ledger = AssetLedger::new(FailingStore::new(memory.clone()).fail_on(op, trigger));
    (memory, ledger)
}

fn assert_store_error(err: &LedgerError, expected: Operation) {
    assert!(
        matches!(err, LedgerError::Store { source: StorageError::Connection { .. }, .. }),
        "expected injected store error, got {err:?}"
    );
    assert_eq!(err.operation(), expected);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn seed_stops_at_first_failed_put_and_keeps_earlier_writes() {
    let (memory, ledger) = failing(StoreOp::Put, FailureTrigger::Nth(2));

    let err = ledger.seed().await.unwrap_err();
    assert_store_error(&err, Operation::Seed);
    assert_eq!(err.key(), Some("Adi"));

    assert_eq!(memory.len(), 2);
    assert!(memory.get("Zaki").await.unwrap().is_some());
    assert!(memory.get("Aya").await.unwrap().is_some());
    assert_eq!(ledger.store().calls(StoreOp::Put), 3);
}

#[rstest]
#[case::create(Operation::Create)]
#[case::read(Operation::Read)]
#[case::update(Operation::Update)]
#[case::delete(Operation::Delete)]
#[case::exists(Operation::Exists)]
#[case::transfer(Operation::Transfer)]
#[tokio::test]
async fn read_failure_names_the_operation(#[case] op: Operation) {
    let (memory, ledger) = failing(StoreOp::Get, FailureTrigger::Always);
    memory.put("Aya", Asset::new("Aya", "RBPF", "2", "HP01").to_bytes().unwrap()).await.unwrap();

    let replacement = Asset::new("Aya", "X", "0", "");
    let err = match op {
        Operation::Create => ledger.create_asset(replacement).await.unwrap_err(),
        Operation::Read => ledger.read_asset("Aya").await.unwrap_err(),
        Operation::Update => ledger.update_asset(replacement).await.unwrap_err(),
        Operation::Delete => ledger.delete_asset("Aya").await.unwrap_err(),
        Operation::Exists => ledger.asset_exists("Aya").await.unwrap_err(),
        Operation::Transfer => ledger.transfer_asset("Aya", "Siti", "KDN").await.unwrap_err(),
        other => unreachable!("not a keyed operation: {other}"),
    };

    assert_store_error(&err, op);
    assert_eq!(err.key(), Some("Aya"));
    assert_eq!(
        memory.get("Aya").await.unwrap().unwrap().as_ref(),
        Asset::new("Aya", "RBPF", "2", "HP01").to_bytes().unwrap().as_slice()
    );
}

#[rstest]
#[case::update(Operation::Update)]
#[case::transfer(Operation::Transfer)]
#[tokio::test]
async fn failed_rewrite_keeps_stored_record(#[case] op: Operation) {
    let (memory, ledger) = failing(StoreOp::Put, FailureTrigger::Always);
    let original = Asset::new("Zaki", "RCED", "1", "HP01/HP02").to_bytes().unwrap();
    // Transfer looks records up by case number.
    let key = match op {
        Operation::Transfer => "1",
        _ => "Zaki",
    };
    memory.put(key, original.clone()).await.unwrap();

    let err = match op {
        Operation::Update => {
            ledger.update_asset(Asset::new("Zaki", "CSB", "9", "SIM09")).await.unwrap_err()
        },
        Operation::Transfer => ledger.transfer_asset("1", "Siti", "KDN").await.unwrap_err(),
        other => unreachable!("not a rewriting operation: {other}"),
    };

    assert_store_error(&err, op);
    assert_eq!(err.key(), Some(key));
    assert_eq!(memory.get(key).await.unwrap().as_deref(), Some(original.as_slice()));
    assert_eq!(ledger.store().calls(StoreOp::Put), 1);
}

#[tokio::test]
async fn failed_delete_keeps_record() {
    let (memory, ledger) = failing(StoreOp::Delete, FailureTrigger::Always);
    memory.put("Dan", Asset::new("Dan", "CSB", "4", "").to_bytes().unwrap()).await.unwrap();

    let err = ledger.delete_asset("Dan").await.unwrap_err();
    assert_store_error(&err, Operation::Delete);
    assert!(ledger.asset_exists("Dan").await.unwrap());
}

#[tokio::test]
async fn scan_open_failure_has_no_key() {
    let (memory, ledger) = failing(StoreOp::Scan, FailureTrigger::Always);

    let err = ledger.all_assets().await.unwrap_err();
    assert_store_error(&err, Operation::ScanAll);
    assert_eq!(err.key(), None);
    assert_eq!(memory.open_cursors(), 0);
}

#[rstest]
#[case::first_entry(0)]
#[case::middle_entry(3)]
#[tokio::test]
async fn cursor_is_released_when_advance_fails(#[case] failing_step: usize) {
    let (memory, ledger) = failing(StoreOp::Next, FailureTrigger::Nth(failing_step));
    ledger.seed().await.unwrap();

    let err = ledger.all_assets().await.unwrap_err();
    assert_store_error(&err, Operation::ScanAll);
    assert_eq!(memory.open_cursors(), 0);
    assert_eq!(ledger.store().calls(StoreOp::Close), 1);
}

#[tokio::test]
async fn cursor_is_released_when_decoding_fails() {
    let memory = MemoryStore::new();
    let ledger = AssetLedger::new(FailingStore::new(memory.clone()));
    ledger.seed().await.unwrap();
    memory.put("Broken", b"{".to_vec()).await.unwrap();

    let err = ledger.all_assets().await.unwrap_err();
    assert!(matches!(err, LedgerError::Decoding { operation: Operation::ScanAll, .. }));
    assert_eq!(err.key(), Some("Broken"));
    assert_eq!(memory.open_cursors(), 0);
    assert_eq!(ledger.store().calls(StoreOp::Close), 1);
}

#[tokio::test]
async fn recovers_once_store_heals() {
    let (_memory, ledger) = failing(StoreOp::Put, FailureTrigger::Always);
    let err = ledger.create_asset(Asset::new("Hana", "PDRM", "9", "HP09")).await.unwrap_err();
    assert_store_error(&err, Operation::Create);
    assert!(!ledger.asset_exists("Hana").await.unwrap());

    ledger.store().heal();
    ledger.create_asset(Asset::new("Hana", "PDRM", "9", "HP09")).await.unwrap();
    assert!(ledger.asset_exists("Hana").await.unwrap());
}
