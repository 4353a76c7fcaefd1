//! Storage error types and result alias.
//!
//! Every [`StateStore`](crate::StateStore) implementation maps its internal
//! failures to [`StorageError`]. A missing key is *not* an error at this
//! layer: [`get`](crate::StateStore::get) returns `Ok(None)` and callers decide
//! what absence means for them.
//!
//! # Error Types
//!
//! - [`StorageError::Conflict`] - Concurrent modification detected by the store
//! - [`StorageError::Connection`] - Network or connection-related failures
//! - [`StorageError::Internal`] - Backend-specific internal errors
//! - [`StorageError::Timeout`] - Operation exceeded time limit
//! - [`StorageError::SizeLimitExceeded`] - Key or value larger than allowed
//! - [`StorageError::CursorClosed`] - Cursor used after release
//!
//! # Example
//!
//! ```
//! use custody_storage::{StorageError, StorageResult};
//!
//! fn lookup(_key: &str) -> StorageResult<Vec<u8>> {
//!     Err(StorageError::connection("peer unreachable"))
//! }
//!
//! assert!(lookup("Zaki").unwrap_err().is_transient());
//! ```

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Errors preserve their source chain via the `#[source]` attribute, so a
/// caller printing the full chain sees the backend's original failure.
///
/// # Non-exhaustive
///
/// New variants may be added in future minor releases. Downstream match
/// expressions must include a wildcard arm.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Another writer modified the same keys and the store rejected this one.
    #[error("Transaction conflict")]
    Conflict,

    /// Connection or network error.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Internal storage backend error.
    ///
    /// Catch-all for backend-specific errors that don't fit other categories.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("Operation timeout")]
    Timeout,

    /// A key or value exceeded a cap set through [`WriteLimits`](crate::WriteLimits).
    #[error("{kind} size {actual} exceeds limit {limit}")]
    SizeLimitExceeded {
        /// Which part of the entry was too large (`"key"` or `"value"`).
        kind: &'static str,
        /// Observed size in bytes.
        actual: usize,
        /// Configured maximum in bytes.
        limit: usize,
    },

    /// A cursor was advanced after it had been released.
    #[error("Cursor already closed")]
    CursorClosed,
}

impl StorageError {
    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict() -> Self {
        Self::Conflict
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Internal` error with a message and source error.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Creates a new `SizeLimitExceeded` error.
    #[must_use]
    pub fn size_limit_exceeded(kind: &'static str, actual: usize, limit: usize) -> Self {
        Self::SizeLimitExceeded { kind, actual, limit }
    }

    /// Returns `true` when retrying the same call could plausibly succeed.
    ///
    /// Only connection failures and timeouts qualify. `Conflict` is not
    /// transient: the caller must re-read before writing again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric setting is below its allowed minimum.
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        /// Name of the offending field.
        field: &'static str,
        /// Smallest accepted value.
        min: String,
        /// Value that was supplied.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn transient_classification() {
        assert!(StorageError::connection("down").is_transient());
        assert!(StorageError::timeout().is_transient());
        assert!(!StorageError::conflict().is_transient());
        assert!(!StorageError::internal("boom").is_transient());
        assert!(!StorageError::size_limit_exceeded("key", 10, 5).is_transient());
        assert!(!StorageError::CursorClosed.is_transient());
    }

    #[test]
    fn source_chain_is_preserved() {
        let err = StorageError::connection_with_source(
            "peer reset",
            io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"),
        );
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("reset by peer"));
        assert_eq!(err.to_string(), "Connection error: peer reset");
    }

    #[test]
    fn size_limit_message_names_the_part() {
        let err = StorageError::size_limit_exceeded("value", 2048, 1024);
        assert_eq!(err.to_string(), "value size 2048 exceeds limit 1024");
    }

    #[test]
    fn config_error_message() {
        let err = ConfigError::BelowMinimum {
            field: "max_key_size",
            min: "1".into(),
            value: "0".into(),
        };
        assert_eq!(err.to_string(), "max_key_size must be at least 1, got 0");
    }
}
