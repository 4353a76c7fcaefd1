//! Conformance test suite for [`StateStore`] implementations.
//!
//! Each function validates one clause of the store contract. A backend runs
//! the suite by calling every function with a fresh, empty store:
//!
//! ```no_run
//! use custody_storage::{MemoryStore, conformance};
//!
//! #[tokio::test]
//! async fn crud_get_returns_none_for_missing_key() {
//!     conformance::crud_get_returns_none_for_missing_key(&MemoryStore::new()).await;
//! }
//! ```
//!
//! # Test Categories
//!
//! | Category | Contract aspect |
//! |----------|-----------------|
//! | CRUD | Point get/put/delete semantics |
//! | Scan | Ordering, bounds, empty-string bounds |
//! | Cursor | has-next / advance / release protocol |
//! | Concurrent | Thread-safety under parallel access |

use std::sync::Arc;

use bytes::Bytes;

use crate::{backend::StateStore, testutil::drain};

// ============================================================================
// CRUD — point get/put/delete semantics
// ============================================================================

/// `get` on a nonexistent key returns `Ok(None)`, not an error.
pub async fn crud_get_returns_none_for_missing_key<S: StateStore>(store: &S) {
    let result = store.get("nonexistent").await;
    assert!(result.is_ok(), "get should not error on missing key: {result:?}");
    assert_eq!(result.expect("checked above"), None, "missing key should return None");
}

/// `put` then `get` round-trips the value.
pub async fn crud_put_then_get_returns_value<S: StateStore>(store: &S) {
    store.put("k1", b"v1".to_vec()).await.expect("put should succeed");
    let val = store.get("k1").await.expect("get should succeed");
    assert_eq!(val, Some(Bytes::from("v1")));
}

/// `put` on an existing key overwrites the value.
pub async fn crud_put_overwrites_existing<S: StateStore>(store: &S) {
    store.put("k1", b"original".to_vec()).await.expect("put");
    store.put("k1", b"updated".to_vec()).await.expect("overwrite");
    let val = store.get("k1").await.expect("get");
    assert_eq!(val, Some(Bytes::from("updated")));
}

/// `delete` on a nonexistent key is a silent no-op.
pub async fn crud_delete_nonexistent_is_noop<S: StateStore>(store: &S) {
    let result = store.delete("ghost").await;
    assert!(result.is_ok(), "delete of nonexistent key should not error: {result:?}");
}

/// `delete` removes a previously stored key.
pub async fn crud_delete_removes_key<S: StateStore>(store: &S) {
    store.put("k2", b"val".to_vec()).await.expect("put");
    store.delete("k2").await.expect("delete");
    let val = store.get("k2").await.expect("get after delete");
    assert_eq!(val, None, "key should be gone after delete");
}

/// Keys differing only in case are distinct.
pub async fn crud_keys_are_case_sensitive<S: StateStore>(store: &S) {
    store.put("zaki", b"lower".to_vec()).await.expect("put lower");
    store.put("Zaki", b"upper".to_vec()).await.expect("put upper");
    assert_eq!(store.get("zaki").await.expect("get"), Some(Bytes::from("lower")));
    assert_eq!(store.get("Zaki").await.expect("get"), Some(Bytes::from("upper")));
}

/// An empty value is stored and is distinct from an absent key.
pub async fn crud_empty_value_is_present<S: StateStore>(store: &S) {
    store.put("empty", Vec::new()).await.expect("put empty value");
    let val = store.get("empty").await.expect("get");
    assert_eq!(val, Some(Bytes::new()), "empty value must still read back as present");
}

// ============================================================================
// Scan — ordering and bounds
// ============================================================================

/// A full scan (`""`, `""`) returns every key in key order.
pub async fn scan_full_namespace_is_ordered<S: StateStore>(store: &S) {
    for key in ["c", "a", "b"] {
        store.put(key, b"v".to_vec()).await.expect("put");
    }
    let entries = drain(store.scan("", "").await.expect("scan")).await.expect("drain");
    crate::assert_scan_keys!(entries, ["a", "b", "c"]);
}

/// A full scan over an empty store yields nothing.
pub async fn scan_empty_store_yields_nothing<S: StateStore>(store: &S) {
    let entries = drain(store.scan("", "").await.expect("scan")).await.expect("drain");
    assert!(entries.is_empty(), "empty store scan should be empty, got {entries:?}");
}

/// `start` is inclusive and `end` is exclusive.
pub async fn scan_start_inclusive_end_exclusive<S: StateStore>(store: &S) {
    for key in ["r:a", "r:b", "r:c"] {
        store.put(key, b"v".to_vec()).await.expect("put");
    }
    let entries = drain(store.scan("r:a", "r:c").await.expect("scan")).await.expect("drain");
    crate::assert_scan_keys!(entries, ["r:a", "r:b"]);
}

/// An empty bound is unbounded on that side only.
pub async fn scan_half_open_bounds<S: StateStore>(store: &S) {
    for key in ["a", "m", "z"] {
        store.put(key, b"v".to_vec()).await.expect("put");
    }
    let tail = drain(store.scan("m", "").await.expect("scan tail")).await.expect("drain");
    crate::assert_scan_keys!(tail, ["m", "z"]);
    let head = drain(store.scan("", "m").await.expect("scan head")).await.expect("drain");
    crate::assert_scan_keys!(head, ["a"]);
}

/// An inverted range is empty, not an error.
pub async fn scan_inverted_range_is_empty<S: StateStore>(store: &S) {
    store.put("b", b"v".to_vec()).await.expect("put");
    let entries = drain(store.scan("z", "a").await.expect("scan")).await.expect("drain");
    assert!(entries.is_empty(), "inverted range should be empty");
}

/// Scanned values are the stored bytes.
pub async fn scan_returns_values<S: StateStore>(store: &S) {
    store.put("k", b"payload".to_vec()).await.expect("put");
    let entries = drain(store.scan("", "").await.expect("scan")).await.expect("drain");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, Bytes::from("payload"));
}

// ============================================================================
// Cursor — has-next / advance / release protocol
// ============================================================================

/// `has_next` tracks whether `next` will yield an entry.
pub async fn cursor_has_next_tracks_remaining<S: StateStore>(store: &S) {
    store.put("only", b"v".to_vec()).await.expect("put");
    let mut cursor = store.scan("", "").await.expect("scan");
    assert!(cursor.has_next(), "cursor over one entry should have next");
    let first = cursor.next().await.expect("next");
    assert_eq!(first.map(|kv| kv.key), Some("only".to_owned()));
    assert!(!cursor.has_next(), "exhausted cursor should not have next");
    assert_eq!(cursor.next().await.expect("next after end"), None);
    cursor.close().await.expect("close");
}

/// Closing a cursor without reading from it succeeds.
pub async fn cursor_close_without_reading<S: StateStore>(store: &S) {
    store.put("k", b"v".to_vec()).await.expect("put");
    let cursor = store.scan("", "").await.expect("scan");
    cursor.close().await.expect("close unread cursor");
}

/// A fresh scan starts over from the beginning.
pub async fn cursor_fresh_scan_restarts<S: StateStore>(store: &S) {
    for key in ["a", "b"] {
        store.put(key, b"v".to_vec()).await.expect("put");
    }
    let mut partial = store.scan("", "").await.expect("scan");
    let _ = partial.next().await.expect("next");
    partial.close().await.expect("close");

    let entries = drain(store.scan("", "").await.expect("rescan")).await.expect("drain");
    crate::assert_scan_keys!(entries, ["a", "b"]);
}

// ============================================================================
// Concurrent — thread-safety under parallel access
// ============================================================================

/// Parallel puts to distinct keys are all visible afterwards.
pub async fn concurrent_puts_are_all_visible<S: StateStore + 'static>(store: Arc<S>) {
    let mut handles = Vec::new();
    for task in 0..8usize {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for seq in 0..16usize {
                let key = format!("t{task}:{seq:03}");
                store.put(&key, key.clone().into_bytes()).await.expect("concurrent put");
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked");
    }

    let entries = drain(store.scan("", "").await.expect("scan")).await.expect("drain");
    assert_eq!(entries.len(), 8 * 16);
    for kv in &entries {
        assert_eq!(kv.value.as_ref(), kv.key.as_bytes(), "value mismatch for {}", kv.key);
    }
}
