//! Test utilities for slotrow development.
//!
//! - [`Tracked`] values report every construction, clone and destruction
//!   to a shared [`Ledger`], so tests can assert that a container created
//!   and destroyed exactly as many values as it should have.
//! - [`CountingAlloc`] and [`BudgetAlloc`] are [`RawAlloc`] strategies
//!   that count block traffic, and fail on demand, respectively.
//!
//! [`RawAlloc`]: slotrow_raw::RawAlloc

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod tracked;

pub use alloc::{AllocStats, BudgetAlloc, CountingAlloc};
pub use tracked::{Ledger, Tracked};
