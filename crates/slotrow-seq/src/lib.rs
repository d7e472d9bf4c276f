//! Growable contiguous sequence for slotrow.
//!
//! [`SlotRow`] owns exactly one [`RawStore`](slotrow_raw::RawStore) and
//! implements the logical operations (append, insert at index, erase a
//! range, index, iterate) by deciding which slots are affected and when
//! to grow. The raw store performs the memory work.
//!
//! Positions are plain indices. [`Cursor`] and [`CursorMut`] bind an
//! index to a particular row; cursor-based insertion and removal
//! translate to the index-based operations.
//!
//! # Growth
//!
//! When an insertion finds no free slot, a block of `max(2 × capacity, 1)`
//! slots (clamped to the configured limit) is acquired, every live value
//! is moved into it, and the old block is released. The new block is
//! acquired before anything is moved, so a failed growth leaves the row
//! unchanged.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod convert;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod row;

pub use cursor::{Cursor, CursorMut};
pub use error::TryInsertError;
pub use iter::{IntoIter, Iter};
pub use row::SlotRow;
