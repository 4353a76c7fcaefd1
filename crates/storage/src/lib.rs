//! Ordered state store abstraction for the custody ledger.
//!
//! This crate provides the [`StateStore`] and [`StateCursor`] traits that the
//! ledger layer is written against, together with [`MemoryStore`], an ordered
//! in-memory implementation for tests and development.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Ledger Layer                            │
//! │        AssetLedger (existence checks, encoding, scans)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   custody-storage                           │
//! │          StateStore + StateCursor traits                    │
//! │            (get, put, delete, scan)                         │
//! ├──────────────┬──────────────────────────────────────────────┤
//! │ MemoryStore  │   World state of a distributed ledger,       │
//! │  (testing)   │   embedded databases, ...                    │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use custody_storage::{MemoryStore, StateStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!
//!     store.put("Aya", b"{}".to_vec()).await?;
//!     assert!(store.get("Aya").await?.is_some());
//!
//!     let mut cursor = store.scan("", "").await?;
//!     while let Some(entry) = cursor.next().await? {
//!         println!("{}", entry.key);
//!     }
//!     cursor.close().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`StorageResult<T>`]. Backends map their internal
//! errors to the [`StorageError`] variants.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` and `conformance` modules (assertion macros, the
//!   `FailingStore` fault injector and the backend conformance suite). Enable this in
//!   `[dev-dependencies]` for integration tests.
//! - **`failpoints`**: Activates the `fail` points compiled into [`MemoryStore`] (`memory-get`,
//!   `memory-put`, `memory-delete`, `memory-scan`, `memory-cursor-next`).

#![deny(unsafe_code)]

pub mod backend;
pub mod config;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used, clippy::panic)]
pub mod conformance;
pub mod cursor;
pub mod error;
pub mod limits;
pub mod memory;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

// Re-export primary types at crate root for convenience
pub use backend::StateStore;
pub use config::MemoryStoreConfig;
pub use cursor::StateCursor;
pub use error::{BoxError, ConfigError, StorageError, StorageResult};
pub use limits::WriteLimits;
pub use memory::MemoryStore;
pub use types::KeyValue;
