//! Fallible insertion error.

use std::error::Error;
use std::fmt;

use slotrow_core::StoreError;

/// A value that could not be inserted because the row failed to grow.
///
/// The row is unchanged and the value is handed back to the caller.
pub struct TryInsertError<T> {
    /// Why the row could not make room.
    pub error: StoreError,
    /// The value that was not inserted.
    pub value: T,
}

impl<T> TryInsertError<T> {
    /// Recover the value that was not inserted.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for TryInsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryInsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for TryInsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insert failed: {}", self.error)
    }
}

impl<T> Error for TryInsertError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_recoverable() {
        let err = TryInsertError {
            error: StoreError::CapacityLimit {
                requested: 5,
                limit: 4,
            },
            value: String::from("kept"),
        };
        assert!(err.to_string().starts_with("insert failed: capacity limit"));
        assert!(err.source().is_some());
        assert_eq!(err.into_inner(), "kept");
    }
}
