//! Configuration for the in-memory state store.
//!
//! [`MemoryStoreConfig`] can be assembled in code through its builder or
//! deserialized from a configuration file. Both paths end in the same
//! validation, which turns the optional caps into [`WriteLimits`]. Leaving a
//! cap out means that part of an entry is unbounded.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, limits::WriteLimits};

/// Configuration for [`MemoryStore`](crate::MemoryStore).
///
/// # Example
///
/// ```
/// use custody_storage::{MemoryStore, MemoryStoreConfig};
///
/// let config = MemoryStoreConfig::builder()
///     .max_key_size(128)
///     .build()?;
///
/// let store = MemoryStore::with_config(&config)?;
/// assert_eq!(store.write_limits().max_key_size(), Some(128));
/// assert_eq!(store.write_limits().max_value_size(), None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryStoreConfig {
    /// Largest accepted key, in bytes. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) max_key_size: Option<usize>,

    /// Largest accepted value, in bytes. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) max_value_size: Option<usize>,
}

#[bon::bon]
impl MemoryStoreConfig {
    /// Creates a new configuration, validating every field.
    ///
    /// # Optional Fields
    ///
    /// * `max_key_size` - Maximum key length in bytes (default: unbounded).
    /// * `max_value_size` - Maximum value length in bytes (default: unbounded).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if a supplied cap is zero.
    #[builder]
    pub fn new(
        max_key_size: Option<usize>,
        max_value_size: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let config = Self { max_key_size, max_value_size };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks a configuration that did not come through the builder,
    /// e.g. one deserialized from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if a supplied cap is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.write_limits().map(|_| ())
    }

    /// Converts the configured caps into [`WriteLimits`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if a supplied cap is zero.
    pub fn write_limits(&self) -> Result<WriteLimits, ConfigError> {
        let mut limits = WriteLimits::unbounded();
        if let Some(bytes) = self.max_key_size {
            limits = limits.with_max_key_size(bytes)?;
        }
        if let Some(bytes) = self.max_value_size {
            limits = limits.with_max_value_size(bytes)?;
        }
        Ok(limits)
    }

    /// Returns the configured key cap.
    #[must_use]
    pub fn max_key_size(&self) -> Option<usize> {
        self.max_key_size
    }

    /// Returns the configured value cap.
    #[must_use]
    pub fn max_value_size(&self) -> Option<usize> {
        self.max_value_size
    }
}
