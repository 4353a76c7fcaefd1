//! In-memory state store implementation.
//!
//! This module provides [`MemoryStore`], an in-memory implementation of
//! [`StateStore`] suitable for testing and development.
//!
//! # Features
//!
//! - **Thread-safe**: Uses [`parking_lot::RwLock`] for concurrent access
//! - **Ordered storage**: Keys are stored in a [`BTreeMap`] for ordered range scans
//! - **Snapshot cursors**: A scan sees the range as it was when the scan was opened
//! - **Cursor accounting**: [`open_cursors`](MemoryStore::open_cursors) reports unreleased
//!   cursors, which lets tests prove release on every path
//! - **Optional write caps**: Writes are checked against [`WriteLimits`], unbounded by default
//!
//! # Performance Characteristics
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | get | O(log n) |
//! | put | O(log n) |
//! | delete | O(log n) |
//! | scan | O(log n + k) where k is result size, paid when the cursor opens |
//!
//! # Limitations
//!
//! - Data is not persisted; all data is lost when the process exits
//! - No write isolation beyond single-operation atomicity

use std::{
    collections::{BTreeMap, VecDeque},
    ops::Bound,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    backend::StateStore,
    config::MemoryStoreConfig,
    cursor::StateCursor,
    error::{ConfigError, StorageError, StorageResult},
    limits::WriteLimits,
    types::KeyValue,
};

/// In-memory ordered state store.
///
/// # Cloning
///
/// `MemoryStore` is cheaply cloneable via [`Arc`]. All clones share the same
/// underlying data and the same cursor accounting.
///
/// # Example
///
/// ```
/// use custody_storage::{MemoryStore, StateStore};
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryStore::new();
///
///     store.put("greeting", b"hello".to_vec()).await.unwrap();
///     let value = store.get("greeting").await.unwrap();
///
///     assert_eq!(value.unwrap().as_ref(), b"hello");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, Bytes>>>,
    open_cursors: Arc<AtomicUsize>,
    write_limits: WriteLimits,
}

impl MemoryStore {
    /// Creates an empty store that accepts entries of any size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_write_limits(WriteLimits::unbounded())
    }

    /// Creates an empty store enforcing the given caps on every write.
    #[must_use]
    pub fn with_write_limits(write_limits: WriteLimits) -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            open_cursors: Arc::new(AtomicUsize::new(0)),
            write_limits,
        }
    }

    /// Creates an empty store from a [`MemoryStoreConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration does not validate.
    pub fn with_config(config: &MemoryStoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_write_limits(config.write_limits()?))
    }

    /// Returns the caps enforced on writes.
    #[must_use]
    pub fn write_limits(&self) -> WriteLimits {
        self.write_limits
    }

    /// Number of cursors handed out by [`scan`](StateStore::scan) that have
    /// not been closed or dropped yet.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns `true` if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Copies the entries of `[start, end)` out of the map, empty bounds
    /// meaning unbounded.
    fn snapshot_range(&self, start: &str, end: &str) -> VecDeque<KeyValue> {
        // BTreeMap::range panics on inverted bounds.
        if !start.is_empty() && !end.is_empty() && start >= end {
            return VecDeque::new();
        }

        let lower = if start.is_empty() { Bound::Unbounded } else { Bound::Included(start) };
        let upper = if end.is_empty() { Bound::Unbounded } else { Bound::Excluded(end) };

        let data = self.data.read();
        data.range::<str, _>((lower, upper))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        fail::fail_point!("memory-get", |_| Err(StorageError::internal("injected get failure")));

        let data = self.data.read();
        Ok(data.get(key).cloned())
    }

    #[tracing::instrument(skip(self, value), fields(value_len = value.len()))]
    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        fail::fail_point!("memory-put", |_| Err(StorageError::internal("injected put failure")));

        self.write_limits.check(key, &value)?;

        let mut data = self.data.write();
        data.insert(key.to_owned(), Bytes::from(value));
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        fail::fail_point!("memory-delete", |_| Err(StorageError::internal(
            "injected delete failure"
        )));

        let mut data = self.data.write();
        data.remove(key);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn scan(&self, start: &str, end: &str) -> StorageResult<Box<dyn StateCursor>> {
        fail::fail_point!("memory-scan", |_| Err(StorageError::internal("injected scan failure")));

        let entries = self.snapshot_range(start, end);
        tracing::trace!(entries = entries.len(), "opened memory cursor");

        Ok(Box::new(MemoryCursor {
            entries,
            _lease: CursorLease::acquire(Arc::clone(&self.open_cursors)),
        }))
    }
}

/// Counts one open cursor for as long as it lives.
///
/// Dropping the lease is the single release point, so a cursor is released
/// exactly once whether it is closed or merely dropped.
#[derive(Debug)]
struct CursorLease {
    open_cursors: Arc<AtomicUsize>,
}

impl CursorLease {
    fn acquire(open_cursors: Arc<AtomicUsize>) -> Self {
        open_cursors.fetch_add(1, Ordering::SeqCst);
        Self { open_cursors }
    }
}

impl Drop for CursorLease {
    fn drop(&mut self) {
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cursor over a snapshot taken when the scan was opened.
#[derive(Debug)]
struct MemoryCursor {
    entries: VecDeque<KeyValue>,
    _lease: CursorLease,
}

#[async_trait]
impl StateCursor for MemoryCursor {
    fn has_next(&self) -> bool {
        !self.entries.is_empty()
    }

    async fn next(&mut self) -> StorageResult<Option<KeyValue>> {
        fail::fail_point!("memory-cursor-next", |_| Err(StorageError::internal(
            "injected cursor failure"
        )));

        Ok(self.entries.pop_front())
    }

    async fn close(self: Box<Self>) -> StorageResult<()> {
        drop(self);
        Ok(())
    }
}
