//! Row configuration and validation.

use std::error::Error;
use std::fmt;

use crate::error::StoreError;

/// Construction parameters for a row.
///
/// Validated once at construction; the row does not consult the config
/// afterwards except for the capacity limit, which travels with its
/// storage across growth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowConfig {
    /// Number of slots to allocate up front.
    ///
    /// Default: 0 (no block until the first insertion).
    pub initial_capacity: usize,

    /// Upper bound on the number of slots the row may ever allocate.
    ///
    /// Default: `None` (bounded only by the address space). When set,
    /// doubling is clamped to the limit and growth past it fails with
    /// [`StoreError::CapacityLimit`].
    pub max_capacity: Option<usize>,
}

impl RowConfig {
    /// Config with no initial block and no capacity limit.
    pub const fn new() -> Self {
        Self {
            initial_capacity: 0,
            max_capacity: None,
        }
    }

    /// Set the initial capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the maximum capacity.
    pub fn with_max_capacity(mut self, limit: usize) -> Self {
        self.max_capacity = Some(limit);
        self
    }

    /// The effective slot limit (`usize::MAX` when unbounded).
    pub fn limit(&self) -> usize {
        self.max_capacity.unwrap_or(usize::MAX)
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] if `max_capacity` is `Some(0)`,
    /// or [`ConfigError::InitialExceedsLimit`] if the initial capacity is
    /// above the limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.max_capacity {
            if limit == 0 {
                return Err(ConfigError::ZeroLimit);
            }
            if self.initial_capacity > limit {
                return Err(ConfigError::InitialExceedsLimit {
                    initial: self.initial_capacity,
                    limit,
                });
            }
        }
        Ok(())
    }
}

impl Default for RowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors detected while building a row from a [`RowConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_capacity` is zero; such a row could never hold an element.
    ZeroLimit,
    /// `initial_capacity` is larger than `max_capacity`.
    InitialExceedsLimit {
        /// The configured initial capacity.
        initial: usize,
        /// The configured limit.
        limit: usize,
    },
    /// The initial block could not be acquired.
    Store(StoreError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLimit => write!(f, "max_capacity must be at least 1"),
            Self::InitialExceedsLimit { initial, limit } => {
                write!(
                    f,
                    "initial_capacity {initial} exceeds max_capacity {limit}"
                )
            }
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
