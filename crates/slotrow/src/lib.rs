//! Slotrow: a growable contiguous array built from explicit raw storage.
//!
//! This is the facade crate that re-exports the public API of the slotrow
//! sub-crates. For most users, adding `slotrow` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use slotrow::prelude::*;
//!
//! let mut row = SlotRow::new();
//! for v in [5, 3, 9, 1] {
//!     row.append(v);
//! }
//! row.insert_at(1, 99);
//! row.remove_range(1..3);
//! assert_eq!(row, [5, 9, 1]);
//!
//! // Slice methods come through `Deref`.
//! row.sort();
//! assert_eq!(row.binary_search(&9), Ok(2));
//!
//! // Cursors are indices bound to a row.
//! let begin = row.begin();
//! assert_eq!((begin + 1).get(), Some(&5));
//! assert!(!(begin - 1).is_valid());
//!
//! // Bounded rows report failure instead of growing.
//! let config = RowConfig::new().with_max_capacity(2);
//! let mut small = SlotRow::with_config(&config).unwrap();
//! small.append('a');
//! small.append('b');
//! let err = small.try_append('c').unwrap_err();
//! assert_eq!(err.into_inner(), 'c');
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slotrow-core` | Errors, configuration, metrics |
//! | [`raw`] | `slotrow-raw` | Raw storage manager and allocation strategies |
//! | [`seq`] | `slotrow-seq` | The row, its cursors and iterators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error types, configuration and metrics (`slotrow-core`).
pub use slotrow_core as types;

/// Raw storage (`slotrow-raw`).
///
/// [`raw::RawStore`] separates slot acquisition from value lifetime;
/// [`raw::RawAlloc`] is the allocation strategy seam.
pub use slotrow_raw as raw;

/// The sequence container (`slotrow-seq`).
///
/// [`seq::SlotRow`] with [`seq::Cursor`], [`seq::CursorMut`] and its
/// iterators.
pub use slotrow_seq as seq;

/// Common imports for typical slotrow usage.
///
/// ```rust
/// use slotrow::prelude::*;
/// ```
pub mod prelude {
    // Container and cursors
    pub use slotrow_seq::{Cursor, CursorMut, SlotRow, TryInsertError};

    // Configuration and errors
    pub use slotrow_core::{ConfigError, RowConfig, RowMetrics, StoreError};

    // Allocation
    pub use slotrow_raw::{Global, RawAlloc};
}
