//! Standalone error types for the pooling engine.
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Most of the
//! engine degrades gracefully instead of failing hard (an exhausted pool
//! yields an empty spawn, not a panic); `PoolError` covers the cases a
//! caller can actually act on, chiefly configuration and registration
//! mistakes and template failures during warm-up.

use thiserror::Error;

/// Pooling engine errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Spawn requested while every slot is checked out and the pool is at
    /// its hard ceiling.
    #[error("object pool '{key}' exhausted (max size: {max_size})")]
    Exhausted { key: String, max_size: usize },

    /// Pool construction rejected before any state was created.
    #[error("invalid pool configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Registration under a key that is already taken.
    #[error("pool key '{key}' is already registered")]
    DuplicateKey { key: String },

    /// Lookup of a key no pool was registered under.
    #[error("no pool registered under key '{key}'")]
    UnknownKey { key: String },

    /// The pool registered under a key holds a different instance type.
    #[error("pool '{key}' holds instances of a different type")]
    TypeMismatch { key: String },

    /// The template failed to manufacture a new instance.
    #[error("template failed to manufacture an instance: {reason}")]
    Manufacture { reason: String },
}

impl PoolError {
    /// Check if the error is retryable.
    ///
    /// Exhaustion clears itself as soon as an active instance is returned;
    /// configuration and registration errors do not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Get error code for categorization.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Exhausted { .. } => "POOL:EXHAUSTED",
            Self::InvalidConfig { .. } => "POOL:CONFIG:INVALID",
            Self::DuplicateKey { .. } => "POOL:KEY:DUPLICATE",
            Self::UnknownKey { .. } => "POOL:KEY:UNKNOWN",
            Self::TypeMismatch { .. } => "POOL:KEY:TYPE",
            Self::Manufacture { .. } => "POOL:TEMPLATE:FAILED",
        }
    }

    // --- Convenience constructors ---

    /// Create a pool exhausted error.
    pub fn exhausted(key: &str, max_size: usize) -> Self {
        Self::Exhausted {
            key: key.to_string(),
            max_size,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a duplicate key error.
    pub fn duplicate_key(key: &str) -> Self {
        Self::DuplicateKey {
            key: key.to_string(),
        }
    }

    /// Create an unknown key error.
    pub fn unknown_key(key: &str) -> Self {
        Self::UnknownKey {
            key: key.to_string(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(key: &str) -> Self {
        Self::TypeMismatch {
            key: key.to_string(),
        }
    }

    /// Create a manufacture failure error.
    pub fn manufacture(reason: impl Into<String>) -> Self {
        Self::Manufacture {
            reason: reason.into(),
        }
    }
}

/// Result type for pooling operations
pub type PoolResult<T> = core::result::Result<T, PoolError>;
