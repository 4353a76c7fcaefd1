//! End-to-end lifecycle of seeded records against the in-memory store.

#![allow(clippy::unwrap_used)]

use custody_ledger::{Asset, AssetLedger, LedgerError, Operation, seed_assets};
use custody_storage::{MemoryStore, StateStore};

async fn seeded() -> AssetLedger<MemoryStore> {
    let ledger = AssetLedger::new(MemoryStore::new());
    ledger.seed().await.unwrap();
    ledger
}

#[tokio::test]
async fn seed_read_delete_scenario() {
    let ledger = seeded().await;

    assert!(ledger.asset_exists("Zaki").await.unwrap());
    assert_eq!(
        ledger.read_asset("Zaki").await.unwrap(),
        Asset::new("Zaki", "RCED", "1", "HP01/HP02")
    );

    ledger.delete_asset("Zaki").await.unwrap();
    assert!(!ledger.asset_exists("Zaki").await.unwrap());

    let err = ledger.read_asset("Zaki").await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { operation: Operation::Read, .. }));
    assert_eq!(err.key(), Some("Zaki"));
}

#[tokio::test]
async fn seed_stores_canonical_bytes() {
    let ledger = seeded().await;
    let raw = ledger.store().get("Zaki").await.unwrap().unwrap();
    assert_eq!(
        raw.as_ref(),
        br#"{"caseNumber":"1","custodianAgency":"RCED","custodianName":"Zaki","evidenceInfo":"HP01/HP02"}"#
    );
}

#[tokio::test]
async fn seed_overwrites_existing_records() {
    let ledger = AssetLedger::new(MemoryStore::new());
    ledger.create_asset(Asset::new("Aya", "PDRM", "99", "SIM09")).await.unwrap();

    ledger.seed().await.unwrap();
    assert_eq!(ledger.read_asset("Aya").await.unwrap().case_number, "2");

    // Seeding twice is harmless.
    ledger.seed().await.unwrap();
    assert_eq!(ledger.store().len(), seed_assets().len());
}

#[tokio::test]
async fn scan_after_seed_returns_seeded_set_in_key_order() {
    let ledger = seeded().await;

    let mut expected = seed_assets();
    expected.sort_by(|a, b| a.custodian_name.cmp(&b.custodian_name));
    assert_eq!(ledger.all_assets().await.unwrap(), expected);

    ledger.delete_asset("Mirul").await.unwrap();
    ledger.create_asset(Asset::new("Bakar", "KDN", "8", "HP08")).await.unwrap();
    let assets = ledger.all_assets().await.unwrap();
    assert_eq!(assets.len(), ledger.store().len());
    assert!(assets.iter().any(|asset| asset.key() == "Bakar"));
    assert!(assets.iter().all(|asset| asset.key() != "Mirul"));
}

#[tokio::test]
async fn ledgers_sharing_a_store_see_each_other() {
    let store = MemoryStore::new();
    let writer = AssetLedger::new(store.clone());
    let reader = AssetLedger::new(store);

    writer.seed().await.unwrap();
    writer.transfer_asset("Adi", "Siti", "RBPF").await.unwrap();

    let moved = reader.read_asset("Adi").await.unwrap();
    assert_eq!(moved, Asset::new("Siti", "RBPF", "3", "HP01/HP02/SIM01/SIM02"));
}

#[tokio::test]
async fn transfer_missing_key_does_not_write() {
    let ledger = seeded().await;
    let before = ledger.all_assets().await.unwrap();

    let err = ledger.transfer_asset("404", "Siti", "RBPF").await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { operation: Operation::Transfer, .. }));
    assert_eq!(ledger.all_assets().await.unwrap(), before);
}

#[tokio::test]
async fn long_custodian_names_are_storable() {
    let ledger = AssetLedger::new(MemoryStore::new());
    let name = "N".repeat(600);
    let asset = Asset::new(name.as_str(), "PDRM", "1", "HP01".repeat(50_000));

    ledger.create_asset(asset.clone()).await.unwrap();
    assert!(ledger.asset_exists(&name).await.unwrap());
    assert_eq!(ledger.read_asset(&name).await.unwrap(), asset);
    assert_eq!(ledger.all_assets().await.unwrap(), [asset]);
}
