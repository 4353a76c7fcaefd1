//! State store trait definition.
//!
//! This module defines [`StateStore`], the ordered key-value contract that the
//! custody ledger runs on top of. A distributed ledger's world state, an
//! embedded database or the in-process [`MemoryStore`](crate::MemoryStore)
//! can all satisfy it.
//!
//! # Design Philosophy
//!
//! - **String keys, byte values**: keys are the record identifiers themselves; values carry no
//!   assumed encoding
//! - **Absence is not an error**: [`get`](StateStore::get) returns `Ok(None)` for a missing key
//! - **Ordered scans**: [`scan`](StateStore::scan) yields entries in key order through a
//!   [`StateCursor`] that owns a store-side resource until released
//! - **Transactional guarantees belong to the store**: callers perform plain read-then-write
//!   sequences and rely on the backend for isolation between concurrent writers
//!
//! # Implementing a Store
//!
//! 1. Implement the [`StateStore`] trait
//! 2. Implement a corresponding [`StateCursor`] type that releases its resources exactly once
//! 3. Map backend-specific errors to [`StorageError`](crate::StorageError)
//! 4. Run the [`conformance`](crate::conformance) suite against it

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{cursor::StateCursor, error::StorageResult};

/// Abstract ordered key-value store.
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Key Operations
///
/// | Method | Description |
/// |--------|-------------|
/// | [`get`](StateStore::get) | Retrieve a single value by key |
/// | [`put`](StateStore::put) | Store a value, overwriting any previous one |
/// | [`delete`](StateStore::delete) | Remove a key |
/// | [`scan`](StateStore::scan) | Open an ordered cursor over a key range |
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use custody_storage::{MemoryStore, StateStore};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = MemoryStore::new();
///
/// store.put("Zaki", b"record".to_vec()).await.unwrap();
/// assert_eq!(store.get("Zaki").await.unwrap(), Some(Bytes::from("record")));
/// # });
/// ```
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Retrieves a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` if the key exists
    /// - `Ok(None)` if the key doesn't exist
    /// - `Err(...)` on storage errors
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>>;

    /// Stores a key-value pair.
    ///
    /// If the key already exists, its value is overwritten.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()>;

    /// Deletes a key.
    ///
    /// If the key doesn't exist, this is a no-op (returns `Ok(())`).
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Opens a cursor over all entries with `start <= key < end`, in key order.
    ///
    /// An empty `start` means "from the first key" and an empty `end` means
    /// "through the last key", so `scan("", "")` covers the whole namespace.
    /// A range whose non-empty `start` is not below its non-empty `end` is
    /// empty.
    ///
    /// The returned cursor holds a store-side resource. It is released by
    /// [`StateCursor::close`] or, failing that, when the cursor is dropped.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn scan(&self, start: &str, end: &str) -> StorageResult<Box<dyn StateCursor>>;
}

/// Shared handles delegate to the store they point at, so a caller can hold
/// an `Arc<dyn StateStore>` chosen at runtime.
#[async_trait]
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key).await
    }

    async fn scan(&self, start: &str, end: &str) -> StorageResult<Box<dyn StateCursor>> {
        (**self).scan(start, end).await
    }
}
