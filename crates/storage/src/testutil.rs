//! Shared test utilities for state store testing.
//!
//! This module provides helpers for building test stores, draining cursors,
//! injecting failures and asserting on [`StorageResult`] values. It is
//! feature-gated behind `testutil` to keep it out of production builds.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! custody-storage = { path = "../storage", features = ["testutil"] }
//! ```
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use custody_storage::testutil::{FailingStore, StoreOp, drain};
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::{
    StateStore,
    cursor::StateCursor,
    error::{StorageError, StorageResult},
    memory::MemoryStore,
    types::KeyValue,
};

/// Create a deterministic test key from a prefix and index.
///
/// Produces keys like `"prefix:000042"`. The zero-padding keeps
/// lexicographic order equal to numeric order.
#[must_use]
pub fn make_key(prefix: &str, idx: usize) -> String {
    format!("{prefix}:{idx:06}")
}

/// Create a [`MemoryStore`] pre-populated with `count` keys built by
/// [`make_key`], each holding `value`.
///
/// # Panics
///
/// Panics if any `put` fails (should not happen with default limits).
pub async fn populated_store(prefix: &str, count: usize, value: &[u8]) -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..count {
        store.put(&make_key(prefix, i), value.to_vec()).await.expect("populate put failed");
    }
    store
}

/// Drains a cursor into a vector and closes it.
///
/// The cursor is released even when draining fails part-way.
pub async fn drain(mut cursor: Box<dyn StateCursor>) -> StorageResult<Vec<KeyValue>> {
    let mut entries = Vec::new();
    loop {
        match cursor.next().await {
            Ok(Some(kv)) => entries.push(kv),
            Ok(None) => break,
            Err(err) => {
                // Release failure is secondary to the step failure.
                let _ = cursor.close().await;
                return Err(err);
            },
        }
    }
    cursor.close().await?;
    Ok(entries)
}

/// Store operation that a [`FailingStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// [`StateStore::get`]
    Get,
    /// [`StateStore::put`]
    Put,
    /// [`StateStore::delete`]
    Delete,
    /// [`StateStore::scan`]
    Scan,
    /// [`StateCursor::next`] on a cursor opened through the store
    Next,
    /// [`StateCursor::close`] on a cursor opened through the store
    Close,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Scan => "scan",
            Self::Next => "next",
            Self::Close => "close",
        };
        f.write_str(name)
    }
}

/// When a configured [`StoreOp`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureTrigger {
    /// Fail every call.
    Always,
    /// Fail only the call with this zero-based index.
    Nth(usize),
    /// Let this many calls succeed, then fail every later call.
    After(usize),
}

impl FailureTrigger {
    fn fires(self, call: usize) -> bool {
        match self {
            Self::Always => true,
            Self::Nth(n) => call == n,
            Self::After(n) => call >= n,
        }
    }
}

#[derive(Debug, Default)]
struct FaultPlan {
    calls: Mutex<HashMap<StoreOp, usize>>,
    triggers: Mutex<HashMap<StoreOp, FailureTrigger>>,
}

impl FaultPlan {
    /// Counts the call and returns the injected error if its trigger fires.
    fn check(&self, op: StoreOp) -> StorageResult<()> {
        let call = {
            let mut calls = self.calls.lock();
            let counter = calls.entry(op).or_insert(0);
            let call = *counter;
            *counter += 1;
            call
        };

        let fires = self.triggers.lock().get(&op).is_some_and(|trigger| trigger.fires(call));
        if fires {
            return Err(StorageError::connection(format!("injected {op} failure on call {call}")));
        }
        Ok(())
    }
}

/// A [`MemoryStore`] wrapper that injects [`StorageError::Connection`]
/// failures into chosen operations.
///
/// Calls are counted per [`StoreOp`] whether or not they fail. Cursors opened
/// through the wrapper count `Next` and `Close` against the same plan and
/// still release the underlying memory cursor when their `close` fails.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use custody_storage::MemoryStore;
/// use custody_storage::testutil::{FailingStore, FailureTrigger, StoreOp};
///
/// let store = FailingStore::new(MemoryStore::new())
///     .fail_on(StoreOp::Put, FailureTrigger::Nth(2));
/// ```
#[derive(Debug, Clone)]
pub struct FailingStore {
    inner: MemoryStore,
    plan: Arc<FaultPlan>,
}

impl FailingStore {
    /// Wraps `inner` with no failures configured.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner, plan: Arc::new(FaultPlan::default()) }
    }

    /// Configures `op` to fail according to `trigger`, replacing any earlier
    /// trigger for the same operation.
    #[must_use]
    pub fn fail_on(self, op: StoreOp, trigger: FailureTrigger) -> Self {
        self.plan.triggers.lock().insert(op, trigger);
        self
    }

    /// Removes every configured failure. Call counts are kept.
    pub fn heal(&self) {
        self.plan.triggers.lock().clear();
    }

    /// Number of times `op` has been attempted.
    #[must_use]
    pub fn calls(&self, op: StoreOp) -> usize {
        self.plan.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// The wrapped store, for inspecting state behind the fault injector.
    #[must_use]
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl StateStore for FailingStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        self.plan.check(StoreOp::Get)?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        self.plan.check(StoreOp::Put)?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.plan.check(StoreOp::Delete)?;
        self.inner.delete(key).await
    }

    async fn scan(&self, start: &str, end: &str) -> StorageResult<Box<dyn StateCursor>> {
        self.plan.check(StoreOp::Scan)?;
        let inner = self.inner.scan(start, end).await?;
        Ok(Box::new(FailingCursor { inner, plan: Arc::clone(&self.plan) }))
    }
}

struct FailingCursor {
    inner: Box<dyn StateCursor>,
    plan: Arc<FaultPlan>,
}

#[async_trait]
impl StateCursor for FailingCursor {
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    async fn next(&mut self) -> StorageResult<Option<KeyValue>> {
        self.plan.check(StoreOp::Next)?;
        self.inner.next().await
    }

    async fn close(self: Box<Self>) -> StorageResult<()> {
        let outcome = self.plan.check(StoreOp::Close);
        self.inner.close().await?;
        outcome
    }
}

/// Assert that a [`StorageResult`] is a [`StorageError::Conflict`].
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use custody_storage::assert_conflict;
/// use custody_storage::error::{StorageError, StorageResult};
///
/// let result: StorageResult<()> = Err(StorageError::Conflict);
/// assert_conflict!(result);
/// ```
#[macro_export]
macro_rules! assert_conflict {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::error::StorageError::Conflict)),
            "expected StorageError::Conflict, got: {:?}",
            $result,
        );
    };
}

/// Assert that a [`StorageResult`] is `Ok`, returning the inner value.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use custody_storage::assert_storage_ok;
/// use custody_storage::error::StorageResult;
///
/// let result: StorageResult<i32> = Ok(42);
/// let value = assert_storage_ok!(result);
/// assert_eq!(value, 42);
/// ```
#[macro_export]
macro_rules! assert_storage_ok {
    ($result:expr) => {
        match $result {
            Ok(val) => val,
            Err(e) => panic!("expected Ok, got StorageError: {e:?}"),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(val) => val,
            Err(e) => panic!("{}: expected Ok, got StorageError: {e:?}", $msg),
        }
    };
}

/// Assert that a scan produced exactly the given keys, in order.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use bytes::Bytes;
/// use custody_storage::{KeyValue, assert_scan_keys};
///
/// let entries = vec![KeyValue::new("a", Bytes::new()), KeyValue::new("b", Bytes::new())];
/// assert_scan_keys!(entries, ["a", "b"]);
/// ```
#[macro_export]
macro_rules! assert_scan_keys {
    ($entries:expr, [$($key:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $entries.iter().map(|kv| kv.key.as_str()).collect();
        let expected: Vec<&str> = vec![$($key),*];
        assert_eq!(actual, expected, "scan keys mismatch");
    }};
}
