//! Error types for storage acquisition and growth.
//!
//! Precondition violations (bad indices, malformed ranges, destroying a
//! store that still holds live elements) are caller bugs and panic. The
//! types here cover the conditions a caller can observe and recover from:
//! the allocation strategy refusing a request, or a requested capacity
//! that cannot be represented or is above the configured limit.

use std::error::Error;
use std::fmt;

/// Returned by an allocation strategy that could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "memory allocation failed")
    }
}

impl Error for AllocError {}

/// Errors that can occur while acquiring or growing a storage block.
///
/// A failed growth never touches the existing block: the new block is
/// acquired before any element is relocated, so the original contents
/// remain valid and unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The requested element count cannot be expressed as a memory layout
    /// (the byte size exceeds `isize::MAX`, or doubling overflowed).
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The allocation strategy refused the request.
    AllocFailed {
        /// Size of the refused request in bytes.
        bytes: usize,
        /// Alignment of the refused request in bytes.
        align: usize,
    },
    /// Growth would exceed the configured maximum capacity.
    CapacityLimit {
        /// Number of element slots that would have been needed.
        requested: usize,
        /// The configured maximum.
        limit: usize,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots cannot be allocated")
            }
            Self::AllocFailed { bytes, align } => {
                write!(f, "allocation of {bytes} bytes (align {align}) failed")
            }
            Self::CapacityLimit { requested, limit } => {
                write!(
                    f,
                    "capacity limit reached: {requested} slots requested, limit is {limit}"
                )
            }
        }
    }
}

impl Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_sizes() {
        let err = StoreError::AllocFailed {
            bytes: 64,
            align: 8,
        };
        assert_eq!(err.to_string(), "allocation of 64 bytes (align 8) failed");

        let err = StoreError::CapacityLimit {
            requested: 9,
            limit: 8,
        };
        assert!(err.to_string().contains("limit is 8"));
    }

    #[test]
    fn store_error_is_std_error() {
        fn takes_error(_: &dyn Error) {}
        takes_error(&StoreError::CapacityOverflow { requested: 1 });
        takes_error(&AllocError);
    }
}
