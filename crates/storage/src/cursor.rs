//! Cursor trait for ordered range scans.
//!
//! A [`StateCursor`] is handed out by [`StateStore::scan`](crate::StateStore::scan)
//! and walks the matching entries in key order. It exposes the three
//! operations a scan consumer needs: "has more" ([`has_next`](StateCursor::has_next)),
//! "advance" ([`next`](StateCursor::next)) and "release" ([`close`](StateCursor::close)).
//!
//! # Release Semantics
//!
//! A cursor owns a store-side resource (an iterator handle, a snapshot, a
//! server-side query id). Implementations release it exactly once: on the
//! first successful or failed call to `close`, or in `Drop` if the cursor is
//! discarded without being closed. Dropping is therefore always safe, while
//! calling `close` lets the caller observe a release failure.
//!
//! # Example
//!
//! ```
//! use custody_storage::{MemoryStore, StateStore};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let store = MemoryStore::new();
//! store.put("a", b"1".to_vec()).await.unwrap();
//! store.put("b", b"2".to_vec()).await.unwrap();
//!
//! let mut cursor = store.scan("", "").await.unwrap();
//! let mut keys = Vec::new();
//! while let Some(kv) = cursor.next().await.unwrap() {
//!     keys.push(kv.key);
//! }
//! cursor.close().await.unwrap();
//!
//! assert_eq!(keys, ["a", "b"]);
//! assert_eq!(store.open_cursors(), 0);
//! # });
//! ```

use async_trait::async_trait;

use crate::{error::StorageResult, types::KeyValue};

/// Forward-only cursor over a key range.
#[async_trait]
pub trait StateCursor: Send {
    /// Returns `true` if another entry is available.
    ///
    /// Returns `false` once the range is exhausted.
    fn has_next(&self) -> bool;

    /// Advances the cursor and returns the next entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(kv))` for the next entry in key order
    /// - `Ok(None)` when the range is exhausted
    /// - `Err(...)` if the store fails to produce the entry
    async fn next(&mut self) -> StorageResult<Option<KeyValue>>;

    /// Releases the cursor's store-side resources.
    ///
    /// Consumes the cursor. The resource counts as released even when this
    /// returns an error.
    async fn close(self: Box<Self>) -> StorageResult<()>;
}
