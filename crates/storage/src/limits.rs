//! Optional per-store caps on entry sizes.
//!
//! A key is whatever string the caller stores under and a value is opaque
//! bytes, so the store contract itself puts no bound on either. A backend
//! with a physical ceiling (a ledger peer's maximum state entry, say) opts in
//! through [`WriteLimits`]; a store built without one accepts every entry.

use std::num::NonZeroUsize;

use crate::{ConfigError, StorageError, StorageResult};

/// Caps applied to each `put`. Unbounded unless a cap is set.
///
/// ```
/// use custody_storage::WriteLimits;
///
/// let limits = WriteLimits::unbounded().with_max_value_size(4096)?;
/// assert_eq!(limits.max_key_size(), None);
/// assert_eq!(limits.max_value_size(), Some(4096));
///
/// assert!(limits.check("any key, however long", b"small").is_ok());
/// assert!(limits.check("k", &[0u8; 4097]).is_err());
/// # Ok::<(), custody_storage::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteLimits {
    max_key_size: Option<NonZeroUsize>,
    max_value_size: Option<NonZeroUsize>,
}

impl WriteLimits {
    /// No caps on keys or values.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_key_size: None, max_value_size: None }
    }

    /// Caps keys at `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if `bytes` is zero.
    pub fn with_max_key_size(self, bytes: usize) -> Result<Self, ConfigError> {
        Ok(Self { max_key_size: Some(nonzero("max_key_size", bytes)?), ..self })
    }

    /// Caps values at `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if `bytes` is zero.
    pub fn with_max_value_size(self, bytes: usize) -> Result<Self, ConfigError> {
        Ok(Self { max_value_size: Some(nonzero("max_value_size", bytes)?), ..self })
    }

    /// Key cap in bytes, if any.
    #[must_use]
    pub fn max_key_size(&self) -> Option<usize> {
        self.max_key_size.map(NonZeroUsize::get)
    }

    /// Value cap in bytes, if any.
    #[must_use]
    pub fn max_value_size(&self) -> Option<usize> {
        self.max_value_size.map(NonZeroUsize::get)
    }

    /// Returns `true` if neither cap is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.max_key_size.is_none() && self.max_value_size.is_none()
    }

    /// Checks an entry about to be written. The key is checked first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::SizeLimitExceeded`] naming the part over its cap.
    pub fn check(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        exceeds("key", key.len(), self.max_key_size)?;
        exceeds("value", value.len(), self.max_value_size)
    }
}

fn nonzero(field: &'static str, bytes: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(bytes).ok_or_else(|| ConfigError::BelowMinimum {
        field,
        min: "1".into(),
        value: bytes.to_string(),
    })
}

fn exceeds(kind: &'static str, actual: usize, cap: Option<NonZeroUsize>) -> StorageResult<()> {
    match cap {
        Some(limit) if actual > limit.get() => {
            Err(StorageError::size_limit_exceeded(kind, actual, limit.get()))
        },
        _ => Ok(()),
    }
}
