//! Custody asset ledger.
//!
//! Each [`Asset`] records who holds a piece of evidence, for which case, and
//! what the evidence is. Records are stored as canonical JSON in an ordered
//! [`StateStore`](custody_storage::StateStore) under their custodian name.
//!
//! [`AssetLedger`] adds existence checks on top of the raw store:
//!
//! | Operation | Missing record | Existing record |
//! |-----------|----------------|-----------------|
//! | [`create_asset`](AssetLedger::create_asset) | written | [`LedgerError::AlreadyExists`] |
//! | [`read_asset`](AssetLedger::read_asset) | [`LedgerError::NotFound`] | returned |
//! | [`update_asset`](AssetLedger::update_asset) | [`LedgerError::NotFound`] | replaced |
//! | [`delete_asset`](AssetLedger::delete_asset) | [`LedgerError::NotFound`] | removed |
//! | [`transfer_asset`](AssetLedger::transfer_asset) | [`LedgerError::NotFound`] | custodian changed |
//!
//! # Example
//!
//! ```
//! use custody_ledger::{Asset, AssetLedger, LedgerError};
//! use custody_storage::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LedgerError> {
//!     let ledger = AssetLedger::new(MemoryStore::new());
//!     ledger.seed().await?;
//!
//!     ledger.create_asset(Asset::new("Hana", "PDRM", "7", "HP01")).await?;
//!     assert!(ledger.asset_exists("Hana").await?);
//!     assert_eq!(ledger.all_assets().await?.len(), 7);
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod asset;
pub mod error;
pub mod ledger;
pub mod seed;

pub use asset::Asset;
pub use error::{LedgerError, LedgerResult, Operation};
pub use ledger::AssetLedger;
pub use seed::seed_assets;
