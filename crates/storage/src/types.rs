//! Common types used across storage operations.

use bytes::Bytes;

/// Key-value pair yielded by a [`StateCursor`](crate::StateCursor).
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use custody_storage::KeyValue;
///
/// let kv = KeyValue::new("Zaki", Bytes::from_static(br#"{"caseNumber":"1"}"#));
/// assert_eq!(kv.key, "Zaki");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// The key identifying this entry.
    pub key: String,

    /// The value stored at this key.
    pub value: Bytes,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: Bytes) -> Self {
        Self { key: key.into(), value }
    }
}
