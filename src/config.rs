//! Pool configuration and validation.

use crate::error::{PoolError, PoolResult};

/// Default hard ceiling when none is specified.
pub const DEFAULT_MAX_SIZE: usize = 64;

/// Configuration for an object pool.
///
/// `max_size` is a hard ceiling that degrades gracefully: a spawn request
/// against a full pool yields an empty result, never unbounded growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of instances a bulk warm-up manufactures ahead of demand.
    /// Also used as the free-list capacity hint at construction.
    pub initial_capacity: usize,
    /// Maximum number of instances the pool will ever track, active plus
    /// free.
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl PoolConfig {
    /// Configuration with a hard ceiling and no pre-allocation.
    #[must_use]
    pub fn bounded(max_size: usize) -> Self {
        Self {
            initial_capacity: 0,
            max_size,
        }
    }

    /// Configuration with both a warm-up target and a hard ceiling.
    #[must_use]
    pub fn warmed(initial_capacity: usize, max_size: usize) -> Self {
        Self {
            initial_capacity,
            max_size,
        }
    }

    /// Validate the configuration, returning an error if invalid.
    ///
    /// Called at pool construction time; a rejected configuration creates
    /// no partial pool.
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_size == 0 {
            return Err(PoolError::invalid_config("max_size must be greater than 0"));
        }
        if self.initial_capacity > self.max_size {
            return Err(PoolError::invalid_config(format!(
                "initial_capacity ({}) must not exceed max_size ({})",
                self.initial_capacity, self.max_size
            )));
        }
        Ok(())
    }
}
