//! Raw slot storage for slotrow.
//!
//! A [`RawStore`] owns one block of uninitialised memory sized in element
//! slots and tracks how many of those slots, counted from index 0, hold
//! live values. It knows nothing about sequence semantics: it constructs
//! into the next free slot, destroys a suffix of the live range, relocates
//! every live value into another store, and swaps blocks in O(1). The
//! sequence layer (`slotrow-seq`) decides *what* happens; this crate only
//! performs the mechanical memory operation.
//!
//! This is the only library crate in the workspace that contains `unsafe`
//! code. Each module that needs it opts in with `#![allow(unsafe_code)]`
//! and every block carries a `// SAFETY:` comment.
//!
//! # Layout
//!
//! ```text
//! RawStore<T, A>
//! ├── block: NonNull<T>        (dangling when nothing is allocated)
//! ├── [0, len)                 live, constructed values
//! ├── [len, capacity)          uninitialised slots
//! ├── max_capacity             growth ceiling, inherited by siblings
//! └── alloc: A                 pluggable allocation strategy (RawAlloc)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod into_iter;
pub mod store;

pub use alloc::{Global, RawAlloc};
pub use into_iter::RawIntoIter;
pub use store::{Growth, RawStore};
