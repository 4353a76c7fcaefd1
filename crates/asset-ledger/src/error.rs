//! Ledger error types and result alias.
//!
//! Every failure names the [`Operation`] that produced it, the key involved
//! when there is one, and the underlying cause as its `#[source]`. Callers
//! match on the variant; the message text is for humans only.
//!
//! # Example
//!
//! ```
//! use custody_ledger::{LedgerError, Operation};
//!
//! let err = LedgerError::not_found(Operation::Delete, "Zaki");
//! assert_eq!(err.to_string(), "delete_asset: asset Zaki does not exist");
//! assert_eq!(err.key(), Some("Zaki"));
//! ```

use std::fmt;

use custody_storage::StorageError;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// The ledger operation a [`LedgerError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`AssetLedger::seed`](crate::AssetLedger::seed)
    Seed,
    /// [`AssetLedger::create_asset`](crate::AssetLedger::create_asset)
    Create,
    /// [`AssetLedger::read_asset`](crate::AssetLedger::read_asset)
    Read,
    /// [`AssetLedger::update_asset`](crate::AssetLedger::update_asset)
    Update,
    /// [`AssetLedger::delete_asset`](crate::AssetLedger::delete_asset)
    Delete,
    /// [`AssetLedger::asset_exists`](crate::AssetLedger::asset_exists)
    Exists,
    /// [`AssetLedger::transfer_asset`](crate::AssetLedger::transfer_asset)
    Transfer,
    /// [`AssetLedger::all_assets`](crate::AssetLedger::all_assets)
    ScanAll,
}

impl Operation {
    /// Stable name used in messages and span fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Create => "create_asset",
            Self::Read => "read_asset",
            Self::Update => "update_asset",
            Self::Delete => "delete_asset",
            Self::Exists => "asset_exists",
            Self::Transfer => "transfer_asset",
            Self::ScanAll => "all_assets",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`AssetLedger`](crate::AssetLedger).
///
/// All errors are terminal for the call that produced them. The ledger never
/// retries and never rolls back writes made earlier in the same call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// A record already exists under the key.
    #[error("{operation}: asset {key} already exists")]
    AlreadyExists {
        /// Failing operation.
        operation: Operation,
        /// Key that was already present.
        key: String,
    },

    /// No record exists under the key.
    #[error("{operation}: asset {key} does not exist")]
    NotFound {
        /// Failing operation.
        operation: Operation,
        /// Key that was absent.
        key: String,
    },

    /// The primary key supplied for a new record is empty.
    #[error("{operation}: custodian name must not be empty")]
    InvalidKey {
        /// Failing operation.
        operation: Operation,
    },

    /// A record could not be serialized.
    #[error("{operation}: failed to encode asset {key}")]
    Encoding {
        /// Failing operation.
        operation: Operation,
        /// Key of the record being written.
        key: String,
        /// Serializer failure.
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes are not a well-formed record.
    #[error("{operation}: failed to decode asset {key}")]
    Decoding {
        /// Failing operation.
        operation: Operation,
        /// Key the malformed value was stored under.
        key: String,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },

    /// The state store failed.
    #[error("{operation}: state store failure{}", key_suffix(.key))]
    Store {
        /// Failing operation.
        operation: Operation,
        /// Key being accessed, absent for whole-namespace scans.
        key: Option<String>,
        /// Store failure.
        #[source]
        source: StorageError,
    },
}

fn key_suffix(key: &Option<String>) -> String {
    key.as_ref().map(|key| format!(" on {key}")).unwrap_or_default()
}

impl LedgerError {
    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(operation: Operation, key: impl Into<String>) -> Self {
        Self::AlreadyExists { operation, key: key.into() }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(operation: Operation, key: impl Into<String>) -> Self {
        Self::NotFound { operation, key: key.into() }
    }

    /// Creates a new `Store` error for an operation on a single key.
    #[must_use]
    pub fn store(operation: Operation, key: impl Into<String>, source: StorageError) -> Self {
        Self::Store { operation, key: Some(key.into()), source }
    }

    /// Creates a new `Store` error for an operation spanning the namespace.
    #[must_use]
    pub fn store_scan(operation: Operation, source: StorageError) -> Self {
        Self::Store { operation, key: None, source }
    }

    /// The operation that failed.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::AlreadyExists { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::InvalidKey { operation }
            | Self::Encoding { operation, .. }
            | Self::Decoding { operation, .. }
            | Self::Store { operation, .. } => *operation,
        }
    }

    /// The key involved, if the failure concerns a single record.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::AlreadyExists { key, .. }
            | Self::NotFound { key, .. }
            | Self::Encoding { key, .. }
            | Self::Decoding { key, .. } => Some(key),
            Self::Store { key, .. } => key.as_deref(),
            Self::InvalidKey { .. } => None,
        }
    }

    /// Returns `true` if the failure was a transient store error, so the
    /// whole call may be retried by a higher layer.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store { source, .. } if source.is_transient())
    }
}
